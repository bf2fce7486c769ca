//! In-memory implementation of TranscriptRepository
//!
//! Used in mock mode and wherever no database is attached.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use echolink::{DomainError, TranscriptEntry, TranscriptRepository};

#[derive(Default)]
pub struct InMemoryTranscriptRepository {
    transcripts: RwLock<HashMap<String, Vec<TranscriptEntry>>>,
}

impl InMemoryTranscriptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptRepository for InMemoryTranscriptRepository {
    async fn save(&self, call_sid: &str, entries: &[TranscriptEntry]) -> Result<usize, DomainError> {
        if call_sid.trim().is_empty() {
            return Err(DomainError::validation("Call SID is required"));
        }

        let mut transcripts = self.transcripts.write().await;
        transcripts
            .entry(call_sid.to_string())
            .or_default()
            .extend_from_slice(entries);

        Ok(entries.len())
    }

    async fn find_by_call(&self, call_sid: &str) -> Result<Vec<TranscriptEntry>, DomainError> {
        let transcripts = self.transcripts.read().await;
        Ok(transcripts.get(call_sid).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echolink::Speaker;

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryTranscriptRepository::new();
        let entries = vec![
            TranscriptEntry::at_offset(Speaker::User, "What's my balance?", 3),
            TranscriptEntry::at_offset(Speaker::Ai, "Let me check.", 5),
        ];

        assert_eq!(repo.save("CA123", &entries).await.unwrap(), 2);
        assert_eq!(repo.find_by_call("CA123").await.unwrap(), entries);
        assert!(repo.find_by_call("CA999").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_later_saves_append() {
        let repo = InMemoryTranscriptRepository::new();
        repo.save("CA123", &[TranscriptEntry::at_offset(Speaker::User, "one", 0)])
            .await
            .unwrap();
        repo.save("CA123", &[TranscriptEntry::at_offset(Speaker::Ai, "two", 1)])
            .await
            .unwrap();

        let stored = repo.find_by_call("CA123").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].text, "two");
    }

    #[tokio::test]
    async fn test_empty_sid_is_rejected() {
        let repo = InMemoryTranscriptRepository::new();
        assert!(repo.save("", &[]).await.is_err());
    }
}
