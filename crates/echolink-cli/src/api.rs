//! EchoLink API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API Client for EchoLink
pub struct EchoLinkClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEntry {
    pub id: String,
    pub caller: String,
    pub phone_number: String,
    pub duration: String,
    pub timestamp: String,
    pub status: String,
    #[serde(default)]
    pub direction: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListCallsResponse {
    pub calls: Vec<CallEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct CreateCallRequest<'a> {
    to: &'a str,
    from: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallResponse {
    pub call_sid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResponse {
    pub sid: String,
    pub duration: u32,
    pub url: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: String,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl EchoLinkClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp: Response = self
            .authed(request)
            .send()
            .await
            .context("Failed to connect to EchoLink API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            bail!("API error ({}): {}", status, message);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Fetch the health document
    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.client.get(self.url("/health"))).await
    }

    /// Check that the configured key is accepted by the call API
    pub async fn verify_key(&self) -> Result<()> {
        self.list_calls(None, 1, 1).await.map(|_| ())
    }

    pub async fn list_calls(
        &self,
        status: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<ListCallsResponse> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }

        self.send(self.client.get(self.url("/api/calls")).query(&query))
            .await
    }

    pub async fn get_call(&self, sid: &str) -> Result<CallEntry> {
        self.send(self.client.get(self.url(&format!("/api/calls/{}", sid))))
            .await
    }

    pub async fn place_call(&self, to: &str, from: &str) -> Result<CreateCallResponse> {
        self.send(
            self.client
                .post(self.url("/api/calls"))
                .json(&CreateCallRequest { to, from }),
        )
        .await
    }

    pub async fn recordings(&self, sid: &str) -> Result<Vec<RecordingResponse>> {
        self.send(
            self.client
                .get(self.url(&format!("/api/calls/{}/recordings", sid))),
        )
        .await
    }

    pub async fn transcript(&self, sid: &str) -> Result<Vec<TranscriptEntry>> {
        self.send(
            self.client
                .get(self.url(&format!("/api/calls/{}/transcript", sid))),
        )
        .await
    }
}
