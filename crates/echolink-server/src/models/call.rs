//! Call - REST API request/response DTOs

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use echolink::{Call, CallDirection, DisplayStatus, Recording, Speaker, TranscriptEntry};

/// A call as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallEntry {
    pub id: String,
    pub caller: String,
    pub phone_number: String,
    /// e.g. "4m 12s"
    pub duration: String,
    /// RFC 3339 start time
    pub timestamp: String,
    #[schema(value_type = String, example = "completed")]
    pub status: DisplayStatus,
    #[schema(value_type = String, example = "inbound")]
    pub direction: CallDirection,
}

impl From<Call> for CallEntry {
    fn from(call: Call) -> Self {
        let status = call.display_status();
        Self {
            timestamp: call
                .start_time
                .unwrap_or_else(Utc::now)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            duration: call.duration.to_string(),
            id: call.sid,
            caller: call.from,
            phone_number: call.to,
            status,
            direction: call.direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCallsResponse {
    pub calls: Vec<CallEntry>,
    pub pagination: Pagination,
}

/// Query parameters for listing calls
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCallsQuery {
    /// Page number, starting at 1 (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub limit: Option<u32>,
    /// completed | ongoing | missed | all, or a raw provider status
    pub status: Option<String>,
}

/// Place outbound call request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCallRequest {
    pub to: Option<String>,
    pub from: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallResponse {
    pub call_sid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResponse {
    pub sid: String,
    /// Seconds
    pub duration: u32,
    pub url: String,
    pub created_at: String,
}

impl From<Recording> for RecordingResponse {
    fn from(recording: Recording) -> Self {
        Self {
            sid: recording.sid,
            duration: recording.duration.as_secs(),
            url: recording.url,
            created_at: recording
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscriptEntryResponse {
    #[schema(value_type = String, example = "AI")]
    pub speaker: Speaker,
    pub text: String,
    /// MM:SS offset into the call
    pub time: String,
}

impl From<TranscriptEntry> for TranscriptEntryResponse {
    fn from(entry: TranscriptEntry) -> Self {
        Self {
            speaker: entry.speaker,
            text: entry.text,
            time: entry.time,
        }
    }
}

/// Status callback acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCallbackResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use echolink::{CallDuration, ProviderCallStatus};

    #[test]
    fn test_call_entry_shape() {
        let call = Call::initiated("CA123", "+15551234567", "+15557654321")
            .with_status(ProviderCallStatus::NoAnswer)
            .with_duration(CallDuration::from_secs(252))
            .with_start_time(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());

        let json = serde_json::to_value(CallEntry::from(call)).unwrap();
        assert_eq!(json["id"], "CA123");
        assert_eq!(json["caller"], "+15551234567");
        assert_eq!(json["phoneNumber"], "+15557654321");
        assert_eq!(json["duration"], "4m 12s");
        assert_eq!(json["timestamp"], "2024-03-01T10:00:00.000Z");
        assert_eq!(json["status"], "missed");
        assert_eq!(json["direction"], "outbound");
    }

    #[test]
    fn test_create_call_response_is_camel_case() {
        let json = serde_json::to_value(CreateCallResponse {
            call_sid: "CA1".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"callSid": "CA1"}));
    }
}
