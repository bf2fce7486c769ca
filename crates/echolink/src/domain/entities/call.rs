//! Call - A phone call as reported by the telephony provider
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CallDirection, CallDuration, DisplayStatus, ProviderCallStatus};

/// Call - lifecycle is owned by the provider; this system only observes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Provider-assigned call SID
    pub sid: String,
    pub from: String,
    pub to: String,
    pub status: ProviderCallStatus,
    pub direction: CallDirection,
    pub duration: CallDuration,
    pub start_time: Option<DateTime<Utc>>,
}

impl Call {
    /// Create a freshly initiated outbound call
    pub fn initiated(sid: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            from: from.into(),
            to: to.into(),
            status: ProviderCallStatus::Initiated,
            direction: CallDirection::Outbound,
            duration: CallDuration::default(),
            start_time: None,
        }
    }

    pub fn display_status(&self) -> DisplayStatus {
        self.status.display_status()
    }

    pub fn with_status(mut self, status: ProviderCallStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_duration(mut self, duration: CallDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_direction(mut self, direction: CallDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Parameters for placing an outbound call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallParams {
    pub to: String,
    pub from: String,
    /// Webhook the provider fetches voice markup from once the call connects
    pub url: String,
    pub status_callback: String,
    pub status_callback_events: Vec<String>,
}

impl CreateCallParams {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        url: impl Into<String>,
        status_callback: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            url: url.into(),
            status_callback: status_callback.into(),
            status_callback_events: ["initiated", "ringing", "answered", "completed"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
