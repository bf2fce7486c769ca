//! Twilio webhook form payloads
//!
//! Only the fields the call flow reads; the provider sends many more.

use serde::Deserialize;
use utoipa::ToSchema;

/// Voice webhook (inbound or outbound call connected)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VoiceWebhookForm {
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "To", default)]
    pub to: String,
}

/// Gather action callback
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SpeechInputForm {
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
    #[serde(rename = "Confidence")]
    pub confidence: Option<String>,
}

/// Status callback
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CallStatusForm {
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    #[serde(rename = "CallStatus", default)]
    pub call_status: String,
    #[serde(rename = "CallDuration")]
    pub call_duration: Option<String>,
}
