//! Mock implementation of TelephonyGateway
//!
//! Derives every answer from the canned call list; no network I/O.

use async_trait::async_trait;
use chrono::Utc;

use echolink::{
    Call, CallDuration, CallFilter, CreateCallParams, DomainError, Recording, RecordingFilter,
    TelephonyGateway,
};

use crate::config::DummyCall;

pub struct MockTelephonyGateway {
    calls: Vec<DummyCall>,
    app_base_url: String,
}

impl MockTelephonyGateway {
    pub fn new(calls: Vec<DummyCall>, app_base_url: impl Into<String>) -> Self {
        Self {
            calls,
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn to_call(dummy: &DummyCall) -> Call {
        Call {
            sid: dummy.id.clone(),
            from: dummy.caller.clone(),
            to: dummy.phone_number.clone(),
            status: dummy.status.provider_status(),
            direction: Default::default(),
            duration: dummy.duration.parse().unwrap_or_else(|e| {
                tracing::warn!("Canned call {} has {}", dummy.id, e);
                CallDuration::default()
            }),
            start_time: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl TelephonyGateway for MockTelephonyGateway {
    async fn create_call(&self, params: &CreateCallParams) -> Result<Call, DomainError> {
        if params.to.trim().is_empty() || params.from.trim().is_empty() {
            return Err(DomainError::validation("Both 'to' and 'from' are required"));
        }

        tracing::info!("Mock create call from {} to {}", params.from, params.to);
        if !params.url.contains("dummy") {
            tracing::warn!("Using non-dummy URL for Twilio webhook: {}", params.url);
        }
        if !params.status_callback.contains("dummy") {
            tracing::warn!(
                "Using non-dummy URL for Twilio status callback: {}",
                params.status_callback
            );
        }

        let sid = format!("DUMMY-CALL-{}", Utc::now().timestamp_millis());
        Ok(Call::initiated(sid, &params.from, &params.to).with_start_time(Utc::now()))
    }

    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<Call>, DomainError> {
        tracing::debug!("Mock list calls with {:?}", filter);

        Ok(self
            .calls
            .iter()
            .map(Self::to_call)
            .filter(|call| {
                filter
                    .status
                    .as_ref()
                    .map_or(true, |status| status.matches(&call.status))
            })
            .skip(filter.offset())
            .take(filter.limit as usize)
            .collect())
    }

    async fn fetch_call(&self, sid: &str) -> Result<Call, DomainError> {
        if sid.trim().is_empty() {
            return Err(DomainError::validation("Call SID is required"));
        }

        // Unknown SIDs fall back to the first canned call
        let dummy = self
            .calls
            .iter()
            .find(|c| c.id == sid)
            .or_else(|| self.calls.first())
            .ok_or_else(|| DomainError::not_found("Call", sid))?;

        Ok(Self::to_call(dummy))
    }

    async fn list_recordings(
        &self,
        filter: &RecordingFilter,
    ) -> Result<Vec<Recording>, DomainError> {
        tracing::debug!("Mock list recordings with {:?}", filter);

        Ok(vec![Recording {
            sid: "DUMMY-RECORDING-1".to_string(),
            call_sid: filter.call_sid.clone(),
            duration: CallDuration::from_secs(252),
            url: format!("{}/dummy-recording.mp3", self.app_base_url),
            created_at: Utc::now(),
        }])
    }

    fn gateway_name(&self) -> &str {
        "mock"
    }
}
