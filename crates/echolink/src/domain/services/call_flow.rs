//! Call Flow - the voice documents each webhook answers with
//!
//! The provider drives the conversation by re-invoking whichever URL the
//! previous document pointed at:
//!
//! ```text
//! voice / outbound-call ──► say greeting ──► gather ──► handle-input
//!        ▲                                    │ (silence)
//!        └──────────── redirect ◄─────────────┘
//!
//! handle-input ──► say reply ──► gather ──► handle-input
//!                                  │ (silence)
//!                                  └──► say goodbye ──► hangup
//! ```

use serde::{Deserialize, Serialize};

use super::voice_response::{Gather, Say, VoiceResponse};

pub const VOICE_PATH: &str = "/api/twilio/voice";
pub const OUTBOUND_CALL_PATH: &str = "/api/twilio/outbound-call";
pub const HANDLE_INPUT_PATH: &str = "/api/twilio/handle-input";
pub const CALL_STATUS_PATH: &str = "/api/twilio/call-status";

pub const INBOUND_GREETING: &str =
    "Welcome to EchoLink, powered by Meta LLAMA 3.0. How can I assist you today?";
pub const OUTBOUND_GREETING: &str = "Hello, this is EchoLink calling. How can I assist you today?";
pub const GATHER_PROMPT: &str = "Please speak after the tone.";
pub const FOLLOW_UP_PROMPT: &str = "Is there anything else I can help you with?";
pub const GOODBYE: &str = "Thank you for calling EchoLink. Goodbye!";
pub const APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again later.";

/// Settings shared by every generated document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFlowSettings {
    /// Public base URL the provider can reach, without trailing slash
    pub app_base_url: String,
    pub voice: String,
    pub speech_model: String,
    pub speech_timeout: String,
}

impl CallFlowSettings {
    pub fn new(app_base_url: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
            voice: voice.into(),
            speech_model: "phone_call".to_string(),
            speech_timeout: "auto".to_string(),
        }
    }

    /// Absolute URL of a webhook path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.app_base_url, path)
    }

    fn say(&self, text: impl Into<String>) -> Say {
        Say::new(&self.voice, text)
    }

    fn gather(&self, prompt: &str) -> Gather {
        Gather::speech(self.url(HANDLE_INPUT_PATH))
            .with_speech_model(&self.speech_model)
            .with_speech_timeout(&self.speech_timeout)
            .with_prompt(self.say(prompt))
    }
}

/// Greeting, speech gather, then a redirect back to `redirect_path` on silence
///
/// Shared by the inbound and outbound entry webhooks.
pub fn entry_prompt(settings: &CallFlowSettings, greeting: &str, redirect_path: &str) -> VoiceResponse {
    VoiceResponse::new()
        .say(settings.say(greeting))
        .gather(settings.gather(GATHER_PROMPT))
        .redirect(settings.url(redirect_path))
}

/// Speak the assistant reply and listen again; hang up on silence
pub fn speech_turn(settings: &CallFlowSettings, reply: &str) -> VoiceResponse {
    VoiceResponse::new()
        .say(settings.say(reply))
        .gather(settings.gather(FOLLOW_UP_PROMPT))
        .say(settings.say(GOODBYE))
        .hangup()
}

/// Terminal document for any failed turn
pub fn apology(settings: &CallFlowSettings) -> VoiceResponse {
    VoiceResponse::new().say(settings.say(APOLOGY)).hangup()
}
