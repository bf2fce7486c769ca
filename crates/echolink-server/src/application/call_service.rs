//! Call Application Service (Use Case)
//!
//! Backs the call REST API.

use std::sync::Arc;

use echolink::{
    Call, CallFilter, CreateCallParams, DomainError, Recording, RecordingFilter,
    TelephonyGateway, TranscriptEntry, TranscriptRepository,
};

/// Webhook URLs handed to the provider when placing a call
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    pub voice: String,
    pub status: String,
}

/// One page of calls
#[derive(Debug, Clone)]
pub struct CallPage {
    pub calls: Vec<Call>,
    pub total: usize,
}

/// Canned data reported in mock mode
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub call_count: usize,
    pub conversation: Vec<TranscriptEntry>,
}

/// Application service for call operations
pub struct CallService {
    gateway: Arc<dyn TelephonyGateway>,
    transcripts: Arc<dyn TranscriptRepository>,
    callbacks: CallbackUrls,
    mock: Option<MockData>,
}

impl CallService {
    pub fn new(
        gateway: Arc<dyn TelephonyGateway>,
        transcripts: Arc<dyn TranscriptRepository>,
        callbacks: CallbackUrls,
    ) -> Self {
        Self {
            gateway,
            transcripts,
            callbacks,
            mock: None,
        }
    }

    pub fn with_mock_data(mut self, mock: MockData) -> Self {
        self.mock = Some(mock);
        self
    }

    /// List calls; `total` is the canned count in mock mode, else the page size returned
    pub async fn list(&self, filter: &CallFilter) -> Result<CallPage, DomainError> {
        let calls = self.gateway.list_calls(filter).await?;
        let total = match &self.mock {
            Some(mock) => mock.call_count,
            None => calls.len(),
        };

        Ok(CallPage { calls, total })
    }

    /// Place an outbound call pointed at our webhooks
    pub async fn place_call(&self, to: &str, from: &str) -> Result<Call, DomainError> {
        let (to, from) = (to.trim(), from.trim());
        if to.is_empty() || from.is_empty() {
            return Err(DomainError::validation("Missing required parameters"));
        }

        let params = CreateCallParams::new(to, from, &self.callbacks.voice, &self.callbacks.status);
        tracing::info!(
            "Placing call from {} to {} (webhook {}, status callback {})",
            from,
            to,
            params.url,
            params.status_callback
        );

        let call = self.gateway.create_call(&params).await?;
        tracing::info!("Call {} initiated via {}", call.sid, self.gateway.gateway_name());

        Ok(call)
    }

    pub async fn get(&self, sid: &str) -> Result<Call, DomainError> {
        self.gateway.fetch_call(sid).await
    }

    pub async fn recordings(&self, sid: &str) -> Result<Vec<Recording>, DomainError> {
        if sid.trim().is_empty() {
            return Err(DomainError::validation("Call SID is required"));
        }
        self.gateway
            .list_recordings(&RecordingFilter::for_call(sid))
            .await
    }

    /// Stored transcript; mock mode falls back to the canned conversation
    pub async fn transcript(&self, sid: &str) -> Result<Vec<TranscriptEntry>, DomainError> {
        let entries = self.transcripts.find_by_call(sid).await?;

        match &self.mock {
            Some(mock) if entries.is_empty() => Ok(mock.conversation.clone()),
            _ => Ok(entries),
        }
    }
}
