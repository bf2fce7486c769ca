//! Twilio REST implementation of TelephonyGateway
//!
//! Talks to the 2010-04-01 API with HTTP basic auth.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use echolink::{
    Call, CallDirection, CallDuration, CallFilter, CreateCallParams, DomainError,
    ProviderCallStatus, Recording, RecordingFilter, TelephonyGateway,
};

use crate::config::TwilioCredentials;

const TWILIO_API_BASE: &str = "https://api.twilio.com";

pub struct TwilioGateway {
    client: Client,
    credentials: TwilioCredentials,
    base_url: String,
}

impl TwilioGateway {
    pub fn new(credentials: TwilioCredentials) -> Result<Self, DomainError> {
        Self::with_base_url(credentials, TWILIO_API_BASE)
    }

    pub fn with_base_url(
        credentials: TwilioCredentials,
        base_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn account_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{}",
            self.base_url, self.credentials.account_sid, resource
        )
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.credentials.account_sid,
            Some(&self.credentials.auth_token),
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Twilio request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Twilio returned {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid Twilio response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct TwilioCall {
    sid: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    status: String,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
}

impl From<TwilioCall> for Call {
    fn from(raw: TwilioCall) -> Self {
        Self {
            sid: raw.sid,
            from: raw.from.unwrap_or_default(),
            to: raw.to.unwrap_or_default(),
            status: ProviderCallStatus::from(raw.status),
            direction: raw
                .direction
                .as_deref()
                .map(CallDirection::from_provider)
                .unwrap_or_default(),
            duration: CallDuration::from_provider(raw.duration.as_deref()),
            start_time: raw.start_time.as_deref().and_then(parse_provider_time),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallPage {
    #[serde(default)]
    calls: Vec<TwilioCall>,
}

#[derive(Debug, Deserialize)]
struct TwilioRecording {
    sid: String,
    #[serde(default)]
    call_sid: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordingPage {
    #[serde(default)]
    recordings: Vec<TwilioRecording>,
}

/// Twilio timestamps are RFC 2822 ("Tue, 31 Aug 2010 20:36:28 +0000")
fn parse_provider_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Playable media URL for a recording resource URI
fn media_url(base_url: &str, uri: &str) -> String {
    let path = uri.strip_suffix(".json").unwrap_or(uri);
    format!("{}{}.mp3", base_url, path)
}

#[async_trait]
impl TelephonyGateway for TwilioGateway {
    async fn create_call(&self, params: &CreateCallParams) -> Result<Call, DomainError> {
        if params.to.trim().is_empty() || params.from.trim().is_empty() {
            return Err(DomainError::validation("Both 'to' and 'from' are required"));
        }

        let mut form: Vec<(&str, &str)> = vec![
            ("To", params.to.as_str()),
            ("From", params.from.as_str()),
            ("Url", params.url.as_str()),
            ("StatusCallback", params.status_callback.as_str()),
        ];
        form.extend(
            params
                .status_callback_events
                .iter()
                .map(|event| ("StatusCallbackEvent", event.as_str())),
        );

        let raw: TwilioCall = self
            .send(self.client.post(self.account_url("Calls.json")).form(&form))
            .await?;

        tracing::info!("Twilio call {} created to {}", raw.sid, params.to);
        Ok(raw.into())
    }

    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<Call>, DomainError> {
        let page_size = filter.limit.to_string();
        let page = (filter.page.max(1) - 1).to_string();
        let mut query: Vec<(&str, &str)> = vec![("PageSize", page_size.as_str()), ("Page", page.as_str())];
        if let Some(status) = filter.status.as_ref().and_then(|s| s.provider_value()) {
            query.push(("Status", status));
        }

        let body: CallPage = self
            .send(self.client.get(self.account_url("Calls.json")).query(&query))
            .await?;

        // Display filters spanning several provider values are applied locally
        Ok(body
            .calls
            .into_iter()
            .map(Call::from)
            .filter(|call| {
                filter
                    .status
                    .as_ref()
                    .map_or(true, |status| status.matches(&call.status))
            })
            .collect())
    }

    async fn fetch_call(&self, sid: &str) -> Result<Call, DomainError> {
        if sid.trim().is_empty() {
            return Err(DomainError::validation("Call SID is required"));
        }

        let response = self
            .authed(self.client.get(self.account_url(&format!("Calls/{sid}.json"))))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Twilio request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::not_found("Call", sid));
        }
        if !response.status().is_success() {
            return Err(DomainError::ExternalService(format!(
                "Twilio returned {}",
                response.status()
            )));
        }

        let raw: TwilioCall = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid Twilio response: {e}")))?;
        Ok(raw.into())
    }

    async fn list_recordings(
        &self,
        filter: &RecordingFilter,
    ) -> Result<Vec<Recording>, DomainError> {
        let limit = filter.limit.map(|l| l.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(call_sid) = filter.call_sid.as_deref() {
            query.push(("CallSid", call_sid));
        }
        if let Some(limit) = limit.as_deref() {
            query.push(("PageSize", limit));
        }

        let body: RecordingPage = self
            .send(self.client.get(self.account_url("Recordings.json")).query(&query))
            .await?;

        Ok(body
            .recordings
            .into_iter()
            .map(|raw| Recording {
                url: raw
                    .uri
                    .as_deref()
                    .map(|uri| media_url(&self.base_url, uri))
                    .unwrap_or_default(),
                sid: raw.sid,
                call_sid: raw.call_sid,
                duration: CallDuration::from_provider(raw.duration.as_deref()),
                created_at: raw
                    .date_created
                    .as_deref()
                    .and_then(parse_provider_time)
                    .unwrap_or_else(Utc::now),
            })
            .collect())
    }

    fn gateway_name(&self) -> &str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use echolink::DisplayStatus;

    #[test]
    fn test_parse_provider_time() {
        let dt = parse_provider_time("Tue, 31 Aug 2010 20:36:28 +0000").unwrap();
        assert_eq!(dt.year(), 2010);
        assert_eq!(dt.hour(), 20);
        assert!(parse_provider_time("2024-03-01T10:00:00Z").is_some());
        assert!(parse_provider_time("yesterday").is_none());
    }

    #[test]
    fn test_call_from_provider_json() {
        let raw: TwilioCall = serde_json::from_value(serde_json::json!({
            "sid": "CA123",
            "from": "+15551234567",
            "to": "+15557654321",
            "status": "no-answer",
            "direction": "outbound-api",
            "duration": "0",
            "start_time": null
        }))
        .unwrap();
        let call = Call::from(raw);

        assert_eq!(call.sid, "CA123");
        assert_eq!(call.display_status(), DisplayStatus::Missed);
        assert_eq!(call.direction, CallDirection::Outbound);
        assert_eq!(call.duration.as_secs(), 0);
        assert!(call.start_time.is_none());
    }

    #[test]
    fn test_call_tolerates_missing_fields() {
        let raw: TwilioCall =
            serde_json::from_value(serde_json::json!({"sid": "CA9", "status": "queued"})).unwrap();
        let call = Call::from(raw);
        assert_eq!(call.from, "");
        assert_eq!(call.duration, CallDuration::default());
        assert_eq!(call.display_status(), DisplayStatus::Ongoing);
    }

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url(
                "https://api.twilio.com",
                "/2010-04-01/Accounts/AC1/Recordings/RE1.json"
            ),
            "https://api.twilio.com/2010-04-01/Accounts/AC1/Recordings/RE1.mp3"
        );
    }

    #[test]
    fn test_account_url() {
        let gateway = TwilioGateway::with_base_url(
            TwilioCredentials {
                account_sid: "AC1".to_string(),
                auth_token: "token".to_string(),
            },
            "https://twilio.test/",
        )
        .unwrap();
        assert_eq!(
            gateway.account_url("Calls.json"),
            "https://twilio.test/2010-04-01/Accounts/AC1/Calls.json"
        );
        assert_eq!(gateway.gateway_name(), "twilio");
    }
}
