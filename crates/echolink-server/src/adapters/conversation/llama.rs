//! LLAMA conversation engine
//!
//! Sends each turn to an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use echolink::{ConversationEngine, DomainError, Speaker, TranscriptEntry};

use crate::config::LlamaSettings;

const SYSTEM_PROMPT: &str = "You are EchoLink, a friendly AI phone assistant powered by Meta LLAMA 3.0. \
Your replies are read aloud to a caller, so keep them short, conversational and free of markup.";

pub struct LlamaConversationEngine {
    client: Client,
    endpoint: String,
    settings: LlamaSettings,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl LlamaConversationEngine {
    pub fn new(endpoint: impl Into<String>, settings: LlamaSettings) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            settings,
        })
    }

    fn build_request<'a>(
        &'a self,
        utterance: &'a str,
        history: &'a [TranscriptEntry],
    ) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        });
        messages.extend(history.iter().map(|entry| ChatMessage {
            role: match entry.speaker {
                Speaker::Ai => "assistant",
                Speaker::User => "user",
            },
            content: &entry.text,
        }));
        messages.push(ChatMessage {
            role: "user",
            content: utterance,
        });

        ChatRequest {
            model: &self.settings.model,
            messages,
            max_tokens: 256,
            temperature: 0.7,
        }
    }
}

#[async_trait]
impl ConversationEngine for LlamaConversationEngine {
    async fn respond(
        &self,
        utterance: &str,
        call_sid: &str,
        history: &[TranscriptEntry],
    ) -> Result<String, DomainError> {
        if utterance.trim().is_empty() {
            return Err(DomainError::validation("Speech input is empty"));
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&self.build_request(utterance, history));
        if let Some(api_key) = &self.settings.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("LLAMA request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "LLAMA API error {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid LLAMA response: {e}")))?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(DomainError::ExternalService(format!(
                "LLAMA returned an empty reply for call {}",
                call_sid
            )));
        }

        tracing::debug!("LLAMA reply for call {}: {}", call_sid, reply);
        Ok(reply)
    }

    fn engine_name(&self) -> &str {
        "llama"
    }
}
