//! Application Configuration
//!
//! Immutable snapshot built once at startup from a key lookup (Shuttle
//! secrets first, then the process environment) and handed to every
//! adapter and service that needs it.

use echolink::{CallFlowSettings, DisplayStatus, Speaker, TranscriptEntry};
use thiserror::Error;

const DEFAULT_VOICE: &str = "Polly.Amy-Neural";
const DEFAULT_LLAMA_MODEL: &str = "llama-3-70b-instruct";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Missing required setting {0} (required when USE_DUMMY_DATA=false)")]
    Missing(&'static str),
}

/// External endpoint URLs
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    /// Voice webhook handed to the provider when placing calls
    pub twilio_webhook: String,
    pub twilio_status_callback: String,
    pub llama_api_endpoint: String,
    /// Public base URL of this service
    pub app_base_url: String,
    /// Tunnel URL used during local development
    pub ngrok_url: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            twilio_webhook: "https://dummy-webhook.echolink.example/voice".to_string(),
            twilio_status_callback: "https://dummy-webhook.echolink.example/status".to_string(),
            llama_api_endpoint: "https://api.dummy-llama.example/v1/chat/completions".to_string(),
            app_base_url: "https://echolink-demo.example".to_string(),
            ngrok_url: "https://dummy-ngrok.example".to_string(),
        }
    }
}

/// Twilio account credentials
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .finish()
    }
}

/// Language model settings
#[derive(Clone)]
pub struct LlamaSettings {
    pub api_key: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for LlamaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlamaSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .finish()
    }
}

/// Where completed-call transcripts are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptStoreKind {
    Memory,
    Postgres,
}

impl std::str::FromStr for TranscriptStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(TranscriptStoreKind::Memory),
            "postgres" => Ok(TranscriptStoreKind::Postgres),
            _ => Err(format!("Unknown transcript store: {}", s)),
        }
    }
}

/// A canned call served in mock mode
#[derive(Debug, Clone)]
pub struct DummyCall {
    pub id: String,
    pub caller: String,
    pub phone_number: String,
    /// Display form, e.g. "4m 12s"
    pub duration: String,
    pub status: DisplayStatus,
}

impl DummyCall {
    fn new(
        id: &str,
        caller: &str,
        phone_number: &str,
        duration: &str,
        status: DisplayStatus,
    ) -> Self {
        Self {
            id: id.to_string(),
            caller: caller.to_string(),
            phone_number: phone_number.to_string(),
            duration: duration.to_string(),
            status,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Serve every external integration from static data
    pub use_dummy_data: bool,
    pub urls: ServiceUrls,
    pub voice: String,
    pub twilio: Option<TwilioCredentials>,
    pub llama: LlamaSettings,
    /// Bearer key protecting the REST API (disabled when unset)
    pub api_key: Option<String>,
    pub transcript_store: TranscriptStoreKind,
    pub dummy_calls: Vec<DummyCall>,
    pub dummy_conversation: Vec<TranscriptEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_dummy_data: true,
            urls: ServiceUrls::default(),
            voice: DEFAULT_VOICE.to_string(),
            twilio: None,
            llama: LlamaSettings {
                api_key: None,
                model: DEFAULT_LLAMA_MODEL.to_string(),
            },
            api_key: None,
            transcript_store: TranscriptStoreKind::Memory,
            dummy_calls: default_dummy_calls(),
            dummy_conversation: default_dummy_conversation(),
        }
    }
}

impl AppConfig {
    /// Build configuration from a key lookup
    ///
    /// Unset keys keep their defaults. Live mode requires Twilio credentials.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("USE_DUMMY_DATA") {
            config.use_dummy_data = parse_bool("USE_DUMMY_DATA", &value)?;
        }

        let urls = &mut config.urls;
        for (key, slot) in [
            ("TWILIO_WEBHOOK_URL", &mut urls.twilio_webhook),
            ("TWILIO_STATUS_CALLBACK_URL", &mut urls.twilio_status_callback),
            ("LLAMA_API_ENDPOINT", &mut urls.llama_api_endpoint),
            ("APP_BASE_URL", &mut urls.app_base_url),
            ("NGROK_URL", &mut urls.ngrok_url),
        ] {
            if let Some(value) = get(key) {
                *slot = value;
            }
        }

        if let Some(voice) = get("TWILIO_VOICE") {
            config.voice = voice;
        }
        if let Some(model) = get("LLAMA_MODEL") {
            config.llama.model = model;
        }
        config.llama.api_key = get("LLAMA_API_KEY");
        config.api_key = get("ECHOLINK_API_KEY");

        config.twilio = match (get("TWILIO_ACCOUNT_SID"), get("TWILIO_AUTH_TOKEN")) {
            (Some(account_sid), Some(auth_token)) => Some(TwilioCredentials {
                account_sid,
                auth_token,
            }),
            _ => None,
        };

        config.transcript_store = match get("TRANSCRIPT_STORE") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TRANSCRIPT_STORE",
                value,
            })?,
            None if config.use_dummy_data => TranscriptStoreKind::Memory,
            None => TranscriptStoreKind::Postgres,
        };

        if !config.use_dummy_data && config.twilio.is_none() {
            return Err(ConfigError::Missing("TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN"));
        }

        Ok(config)
    }

    pub fn call_flow_settings(&self) -> CallFlowSettings {
        CallFlowSettings::new(&self.urls.app_base_url, &self.voice)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn default_dummy_calls() -> Vec<DummyCall> {
    vec![
        DummyCall::new(
            "dummy-1",
            "John Smith",
            "+1 (555) 123-4567",
            "4m 12s",
            DisplayStatus::Completed,
        ),
        DummyCall::new(
            "dummy-2",
            "Sarah Johnson",
            "+1 (555) 987-6543",
            "2m 45s",
            DisplayStatus::Completed,
        ),
        DummyCall::new(
            "dummy-3",
            "Michael Brown",
            "+1 (555) 456-7890",
            "0m 0s",
            DisplayStatus::Missed,
        ),
        DummyCall::new(
            "dummy-4",
            "Emma Wilson",
            "+1 (555) 789-0123",
            "8m 32s",
            DisplayStatus::Ongoing,
        ),
    ]
}

fn default_dummy_conversation() -> Vec<TranscriptEntry> {
    [
        (Speaker::Ai, "Hello, thank you for calling EchoLink. How can I assist you today?", "00:00"),
        (Speaker::User, "Hi, I'd like to check my account balance please.", "00:05"),
        (Speaker::Ai, "I'd be happy to help you check your account balance. Could you please verify your identity by providing your account number?", "00:10"),
        (Speaker::User, "Sure, my account number is 12345678.", "00:20"),
        (Speaker::Ai, "Thank you for providing your account number. For security purposes, could you also please confirm your date of birth?", "00:25"),
        (Speaker::User, "It's January 15, 1980.", "00:32"),
        (Speaker::Ai, "Thank you for verifying your information. I can confirm that your current account balance is $1,250.75. Is there anything else you would like to know?", "00:38"),
    ]
    .into_iter()
    .map(|(speaker, text, time)| TranscriptEntry::new(speaker, text, time))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_mock_mode() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.use_dummy_data);
        assert_eq!(config.urls.app_base_url, "https://echolink-demo.example");
        assert_eq!(config.voice, "Polly.Amy-Neural");
        assert_eq!(config.transcript_store, TranscriptStoreKind::Memory);
        assert_eq!(config.dummy_calls.len(), 4);
        assert_eq!(config.dummy_conversation.len(), 7);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_BASE_URL", "https://calls.example.com"),
            ("TWILIO_VOICE", "alice"),
            ("ECHOLINK_API_KEY", "secret"),
            ("TRANSCRIPT_STORE", "postgres"),
            ("LLAMA_MODEL", ""),
        ]))
        .unwrap();

        assert_eq!(config.urls.app_base_url, "https://calls.example.com");
        assert_eq!(config.voice, "alice");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.transcript_store, TranscriptStoreKind::Postgres);
        // Blank values keep the default
        assert_eq!(config.llama.model, DEFAULT_LLAMA_MODEL);
    }

    #[test]
    fn test_live_mode_requires_twilio_credentials() {
        let err = AppConfig::from_lookup(lookup(&[("USE_DUMMY_DATA", "false")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));

        let config = AppConfig::from_lookup(lookup(&[
            ("USE_DUMMY_DATA", "false"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "token"),
        ]))
        .unwrap();
        assert!(!config.use_dummy_data);
        assert_eq!(config.transcript_store, TranscriptStoreKind::Postgres);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("USE_DUMMY_DATA", "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TRANSCRIPT_STORE", "redis")])).is_err());
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let creds = TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "hunter2".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
