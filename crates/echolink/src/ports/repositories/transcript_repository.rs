//! Transcript Repository Port
//!
//! Abstract interface for persisting call transcripts.

use async_trait::async_trait;

use crate::domain::entities::TranscriptEntry;
use crate::domain::errors::DomainError;

/// Repository interface for call transcripts
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Append `entries` to the stored transcript of `call_sid`
    ///
    /// Returns the number of entries written.
    async fn save(&self, call_sid: &str, entries: &[TranscriptEntry]) -> Result<usize, DomainError>;

    /// Stored transcript of a call, in spoken order
    async fn find_by_call(&self, call_sid: &str) -> Result<Vec<TranscriptEntry>, DomainError>;
}
