//! Conversation Engine Port
//!
//! Abstract interface for producing the assistant's spoken reply to a
//! caller utterance. Live engines call a hosted language model; the mock
//! engine replays a canned conversation.

use async_trait::async_trait;

use crate::domain::entities::TranscriptEntry;
use crate::domain::errors::DomainError;

/// Conversation engine interface
///
/// The call flow relies on a single contract: non-empty input text yields
/// non-empty reply text, or an error.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Produce a reply to `utterance`
    ///
    /// `history` holds the call's prior turns and does not include
    /// `utterance`.
    async fn respond(
        &self,
        utterance: &str,
        call_sid: &str,
        history: &[TranscriptEntry],
    ) -> Result<String, DomainError>;

    /// Engine name for logs ("mock", "llama")
    fn engine_name(&self) -> &str;
}
