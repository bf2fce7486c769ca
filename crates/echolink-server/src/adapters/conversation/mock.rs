//! Mock implementation of ConversationEngine
//!
//! Replays the AI side of the canned conversation, one line per turn.

use async_trait::async_trait;

use echolink::{ConversationEngine, DomainError, TranscriptEntry};

pub struct MockConversationEngine {
    replies: Vec<String>,
}

impl MockConversationEngine {
    /// Build from a canned conversation; its opening AI greeting is skipped
    pub fn new(conversation: &[TranscriptEntry]) -> Self {
        let replies = conversation
            .iter()
            .filter(|entry| entry.is_ai())
            .skip(1)
            .map(|entry| entry.text.clone())
            .collect();

        Self { replies }
    }
}

#[async_trait]
impl ConversationEngine for MockConversationEngine {
    async fn respond(
        &self,
        utterance: &str,
        call_sid: &str,
        history: &[TranscriptEntry],
    ) -> Result<String, DomainError> {
        if utterance.trim().is_empty() {
            return Err(DomainError::validation("Speech input is empty"));
        }
        if self.replies.is_empty() {
            return Err(DomainError::NotConfigured(
                "Canned conversation has no replies".to_string(),
            ));
        }

        let turn = history.iter().filter(|entry| entry.is_ai()).count();
        tracing::debug!("Mock reply #{} for call {}", turn, call_sid);

        Ok(self.replies[turn % self.replies.len()].clone())
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use echolink::Speaker;

    fn engine() -> MockConversationEngine {
        MockConversationEngine::new(&AppConfig::default().dummy_conversation)
    }

    #[tokio::test]
    async fn test_replies_advance_with_history() {
        let engine = engine();

        let first = engine.respond("What's my balance?", "CA123", &[]).await.unwrap();
        assert!(first.starts_with("I'd be happy to help"));

        let history = vec![
            TranscriptEntry::at_offset(Speaker::User, "What's my balance?", 0),
            TranscriptEntry::at_offset(Speaker::Ai, first, 2),
        ];
        let second = engine.respond("12345678", "CA123", &history).await.unwrap();
        assert!(second.contains("date of birth"));
    }

    #[tokio::test]
    async fn test_replies_cycle_when_exhausted() {
        let engine = engine();
        let history: Vec<TranscriptEntry> = (0..3)
            .map(|i| TranscriptEntry::at_offset(Speaker::Ai, "earlier", i))
            .collect();

        let reply = engine.respond("hello again", "CA123", &history).await.unwrap();
        assert!(reply.starts_with("I'd be happy to help"));
    }

    #[tokio::test]
    async fn test_empty_utterance_is_rejected() {
        let result = engine().respond("   ", "CA123", &[]).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_conversation_errors() {
        let engine = MockConversationEngine::new(&[]);
        assert!(engine.respond("hi", "CA123", &[]).await.is_err());
    }
}
