//! Call Flow Application Service (Use Case)
//!
//! Answers the provider's webhooks: greets callers, runs speech turns
//! through the conversation engine and stores transcripts on completion.

use std::sync::Arc;

use echolink::{
    call_flow::{self, OUTBOUND_CALL_PATH, VOICE_PATH},
    CallFlowSettings, ConversationEngine, DomainError, ProviderCallStatus, Speaker,
    TranscriptRepository, VoiceResponse,
};

use super::ConversationHistory;

/// Application service for the webhook-driven call flow
pub struct CallFlowService {
    settings: CallFlowSettings,
    engine: Arc<dyn ConversationEngine>,
    transcripts: Arc<dyn TranscriptRepository>,
    history: ConversationHistory,
}

impl CallFlowService {
    pub fn new(
        settings: CallFlowSettings,
        engine: Arc<dyn ConversationEngine>,
        transcripts: Arc<dyn TranscriptRepository>,
    ) -> Self {
        Self {
            settings,
            engine,
            transcripts,
            history: ConversationHistory::new(),
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Greeting document for a call the provider just connected to us
    pub fn inbound_entry(&self, call_sid: &str, from: &str, to: &str) -> VoiceResponse {
        tracing::info!("Incoming call {} from {} to {}", call_sid, from, to);
        call_flow::entry_prompt(&self.settings, call_flow::INBOUND_GREETING, VOICE_PATH)
    }

    /// Greeting document for a call we placed
    pub fn outbound_entry(&self, call_sid: &str, from: &str, to: &str) -> VoiceResponse {
        tracing::info!("Outbound call {} connected from {} to {}", call_sid, from, to);
        call_flow::entry_prompt(&self.settings, call_flow::OUTBOUND_GREETING, OUTBOUND_CALL_PATH)
    }

    pub fn apology(&self) -> VoiceResponse {
        call_flow::apology(&self.settings)
    }

    /// One speech turn; every failure becomes the spoken apology
    pub async fn handle_speech(&self, call_sid: &str, speech: Option<&str>) -> VoiceResponse {
        match self.speech_turn(call_sid, speech).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error handling speech input for call {}: {}", call_sid, e);
                self.apology()
            }
        }
    }

    async fn speech_turn(
        &self,
        call_sid: &str,
        speech: Option<&str>,
    ) -> Result<VoiceResponse, DomainError> {
        if call_sid.trim().is_empty() {
            return Err(DomainError::validation("CallSid is missing"));
        }
        let utterance = speech
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::validation("SpeechResult is missing"))?;

        tracing::info!("Received speech input for call {}: {}", call_sid, utterance);

        let prior = self.history.snapshot(call_sid).await;
        self.history.append(call_sid, Speaker::User, utterance).await;

        let reply = self.engine.respond(utterance, call_sid, &prior).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(DomainError::ExternalService(format!(
                "{} engine returned an empty reply",
                self.engine.engine_name()
            )));
        }

        self.history.append(call_sid, Speaker::Ai, reply).await;
        Ok(call_flow::speech_turn(&self.settings, reply))
    }

    /// Status callback; persists the transcript once the call is completed
    ///
    /// Other terminal statuses discard the call's history. Returns the number
    /// of stored entries, or `None` when nothing was persisted.
    pub async fn handle_status(
        &self,
        call_sid: &str,
        status: &ProviderCallStatus,
    ) -> Result<Option<usize>, DomainError> {
        tracing::info!("Call {} status update: {}", call_sid, status);

        if !status.is_terminal() {
            return Ok(None);
        }

        let entries = self.history.drain(call_sid).await;
        if !status.is_completed() {
            if !entries.is_empty() {
                tracing::warn!(
                    "Call {} ended {}; discarding {} transcript entries",
                    call_sid,
                    status,
                    entries.len()
                );
            }
            return Ok(None);
        }

        tracing::debug!(
            "{} calls still hold live transcripts",
            self.history.active_calls().await
        );
        match self.transcripts.save(call_sid, &entries).await {
            Ok(saved) => {
                tracing::info!("Saved {} transcript entries for call {}", saved, call_sid);
                Ok(Some(saved))
            }
            Err(e) => {
                tracing::error!("Failed to save transcript for call {}: {}", call_sid, e);
                self.history.restore(call_sid, entries).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTranscriptRepository, MockConversationEngine};
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use echolink::TranscriptEntry;

    struct FailingEngine;

    #[async_trait]
    impl ConversationEngine for FailingEngine {
        async fn respond(
            &self,
            _utterance: &str,
            _call_sid: &str,
            _history: &[TranscriptEntry],
        ) -> Result<String, DomainError> {
            Err(DomainError::ExternalService("model unavailable".to_string()))
        }

        fn engine_name(&self) -> &str {
            "failing"
        }
    }

    /// Records the history length it was handed on each turn
    #[derive(Default)]
    struct CapturingEngine {
        seen: std::sync::Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl ConversationEngine for CapturingEngine {
        async fn respond(
            &self,
            utterance: &str,
            _call_sid: &str,
            history: &[TranscriptEntry],
        ) -> Result<String, DomainError> {
            assert!(history.iter().all(|e| e.text != utterance));
            self.seen
                .lock()
                .unwrap()
                .push((utterance.to_string(), history.len()));
            Ok("Noted.".to_string())
        }

        fn engine_name(&self) -> &str {
            "capturing"
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl TranscriptRepository for FailingRepository {
        async fn save(&self, _: &str, _: &[TranscriptEntry]) -> Result<usize, DomainError> {
            Err(DomainError::Repository("connection refused".to_string()))
        }

        async fn find_by_call(&self, _: &str) -> Result<Vec<TranscriptEntry>, DomainError> {
            Ok(vec![])
        }
    }

    fn service_with(
        engine: Arc<dyn ConversationEngine>,
        transcripts: Arc<dyn TranscriptRepository>,
    ) -> CallFlowService {
        CallFlowService::new(AppConfig::default().call_flow_settings(), engine, transcripts)
    }

    fn mock_service(transcripts: Arc<dyn TranscriptRepository>) -> CallFlowService {
        let engine = MockConversationEngine::new(&AppConfig::default().dummy_conversation);
        service_with(Arc::new(engine), transcripts)
    }

    #[test]
    fn test_entry_documents() {
        let service = mock_service(Arc::new(InMemoryTranscriptRepository::new()));

        let inbound = service.inbound_entry("CA123", "+15551234567", "+15557654321").to_xml();
        assert!(inbound.contains(call_flow::INBOUND_GREETING));
        assert!(inbound.contains("https://echolink-demo.example/api/twilio/voice</Redirect>"));

        let outbound = service.outbound_entry("CA123", "+15551234567", "+15557654321").to_xml();
        assert!(outbound.contains(call_flow::OUTBOUND_GREETING));
        assert!(outbound.contains("https://echolink-demo.example/api/twilio/outbound-call</Redirect>"));
    }

    #[tokio::test]
    async fn test_speech_turn_records_both_sides() {
        let service = mock_service(Arc::new(InMemoryTranscriptRepository::new()));

        let xml = service.handle_speech("CA123", Some("What's my balance?")).await.to_xml();
        assert!(xml.contains("I&apos;d be happy to help"));
        assert!(xml.contains(call_flow::FOLLOW_UP_PROMPT));

        let history = service.history().snapshot("CA123").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[0].text, "What's my balance?");
        assert_eq!(history[1].speaker, Speaker::Ai);
    }

    #[tokio::test]
    async fn test_engine_sees_prior_turns_only() {
        let engine = Arc::new(CapturingEngine::default());
        let service = service_with(engine.clone(), Arc::new(InMemoryTranscriptRepository::new()));

        service.handle_speech("CA123", Some("first")).await;
        service.handle_speech("CA123", Some("second")).await;

        let seen = engine.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("first".to_string(), 0), ("second".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_missing_speech_apologizes() {
        let service = mock_service(Arc::new(InMemoryTranscriptRepository::new()));

        for speech in [None, Some(""), Some("   ")] {
            let xml = service.handle_speech("CA123", speech).await.to_xml();
            assert!(xml.contains(call_flow::APOLOGY));
            assert!(xml.ends_with("<Hangup/></Response>"));
        }
        assert!(service.history().snapshot("CA123").await.is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_apologizes() {
        let service = service_with(
            Arc::new(FailingEngine),
            Arc::new(InMemoryTranscriptRepository::new()),
        );

        let response = service.handle_speech("CA123", Some("Hello?")).await;
        assert!(response.to_xml().contains(call_flow::APOLOGY));
        assert!(response.ends_call());
    }

    #[tokio::test]
    async fn test_completed_status_persists_history() {
        let repo = Arc::new(InMemoryTranscriptRepository::new());
        let service = mock_service(repo.clone());

        service.handle_speech("CA123", Some("What's my balance?")).await;
        let saved = service
            .handle_status("CA123", &ProviderCallStatus::Completed)
            .await
            .unwrap();

        assert_eq!(saved, Some(2));
        assert_eq!(repo.find_by_call("CA123").await.unwrap().len(), 2);
        assert!(service.history().snapshot("CA123").await.is_empty());
    }

    #[tokio::test]
    async fn test_other_statuses_are_ignored() {
        let repo = Arc::new(InMemoryTranscriptRepository::new());
        let service = mock_service(repo.clone());
        service.handle_speech("CA123", Some("Hi")).await;

        for status in ["ringing", "in-progress", "answered"] {
            let result = service
                .handle_status("CA123", &ProviderCallStatus::from(status))
                .await
                .unwrap();
            assert_eq!(result, None);
        }
        assert!(repo.find_by_call("CA123").await.unwrap().is_empty());
        assert_eq!(service.history().snapshot("CA123").await.len(), 2);
    }

    #[tokio::test]
    async fn test_unsuccessful_end_discards_history() {
        let repo = Arc::new(InMemoryTranscriptRepository::new());
        let service = mock_service(repo.clone());

        for (sid, status) in [
            ("CA1", ProviderCallStatus::Failed),
            ("CA2", ProviderCallStatus::Busy),
            ("CA3", ProviderCallStatus::NoAnswer),
            ("CA4", ProviderCallStatus::Canceled),
        ] {
            service.handle_speech(sid, Some("hello")).await;
            let result = service.handle_status(sid, &status).await.unwrap();
            assert_eq!(result, None);
            assert!(repo.find_by_call(sid).await.unwrap().is_empty());
        }

        assert_eq!(service.history().active_calls().await, 0);
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_history() {
        let service = mock_service(Arc::new(FailingRepository));
        service.handle_speech("CA123", Some("Hi")).await;

        let result = service
            .handle_status("CA123", &ProviderCallStatus::Completed)
            .await;

        assert!(matches!(result, Err(DomainError::Repository(_))));
        assert_eq!(service.history().snapshot("CA123").await.len(), 2);
    }
}
