//! Telephony Gateway Port
//!
//! Abstract interface to the telephony provider's call-control API.
//! A mock implementation serves canned calls; a live one wraps the
//! provider's REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Call, CreateCallParams, Recording};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::StatusFilter;

/// Page of calls to list, optionally narrowed by status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFilter {
    pub status: Option<StatusFilter>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl CallFilter {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            status: None,
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn with_status(mut self, status: Option<StatusFilter>) -> Self {
        self.status = status;
        self
    }

    /// Number of items to skip before this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }
}

impl Default for CallFilter {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Recordings lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingFilter {
    pub call_sid: Option<String>,
    pub limit: Option<u32>,
}

impl RecordingFilter {
    pub fn for_call(call_sid: impl Into<String>) -> Self {
        Self {
            call_sid: Some(call_sid.into()),
            limit: None,
        }
    }
}

/// Telephony provider interface
///
/// # Example
///
/// ```rust,ignore
/// use echolink::ports::TelephonyGateway;
///
/// let call = gateway.create_call(&params).await?;
/// tracing::info!("Placed call {}", call.sid);
/// ```
#[async_trait]
pub trait TelephonyGateway: Send + Sync {
    /// Initiate an outbound call
    async fn create_call(&self, params: &CreateCallParams) -> Result<Call, DomainError>;

    /// List calls, most recent first
    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<Call>, DomainError>;

    /// Fetch a single call by SID
    async fn fetch_call(&self, sid: &str) -> Result<Call, DomainError>;

    /// List recordings
    async fn list_recordings(&self, filter: &RecordingFilter)
        -> Result<Vec<Recording>, DomainError>;

    /// Gateway name for logs ("mock", "twilio")
    fn gateway_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_offset() {
        assert_eq!(CallFilter::new(1, 10).offset(), 0);
        assert_eq!(CallFilter::new(3, 10).offset(), 20);
        // Zero page and limit are clamped
        let filter = CallFilter::new(0, 0);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 1);
        assert_eq!(filter.offset(), 0);
    }
}
