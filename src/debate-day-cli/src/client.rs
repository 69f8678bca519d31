//! Typed HTTP client for the coordination API.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use debate_day_core::{
    DebateSession, DebateSnapshot, DebateSummary, MessageRecord, Role, SessionStatus, Speaker,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error from the server, keyed by its machine-readable kind.
    #[error("{message}")]
    Api { kind: String, message: String },
}

impl ApiClientError {
    /// A turn violation is normal flow for a polling worker: somebody
    /// else got the slot first, or we polled too early.
    pub fn is_turn_violation(&self) -> bool {
        matches!(self, ApiClientError::Api { kind, .. } if kind == "turn_violation")
    }

    pub fn is_debate_finished(&self) -> bool {
        matches!(self, ApiClientError::Api { kind, .. } if kind == "debate_finished")
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    kind: String,
    error: String,
}

/// Turn info as served by `GET /api/turn/{debate_id}`.
#[derive(Debug, Deserialize)]
pub struct TurnInfo {
    pub debate_id: String,
    pub current_round: u32,
    pub next_speaker: Speaker,
    pub is_final_turn: bool,
    pub status: SessionStatus,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }
        let status = response.status();
        let wire = response.json::<WireError>().await.unwrap_or_else(|_| WireError {
            kind: "internal".to_owned(),
            error: format!("HTTP {status}"),
        });
        Err(ApiClientError::Api {
            kind: wire.kind,
            message: wire.error,
        })
    }

    pub async fn start_debate(
        &self,
        topic: &str,
        rounds: u32,
        debate_id: Option<&str>,
    ) -> Result<DebateSession, ApiClientError> {
        let body = serde_json::json!({
            "topic": topic,
            "rounds": rounds,
            "debate_id": debate_id,
        });
        let response = self
            .http
            .post(format!("{}/api/start", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn submit_message(
        &self,
        debate_id: &str,
        sender: &str,
        role: Role,
        content: &str,
        metadata: Map<String, Value>,
    ) -> Result<MessageRecord, ApiClientError> {
        let body = serde_json::json!({
            "sender": sender,
            "role": role,
            "content": content,
            "metadata": metadata,
        });
        let response = self
            .http
            .post(format!("{}/api/message/{debate_id}", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn turn(&self, debate_id: &str) -> Result<TurnInfo, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/api/turn/{debate_id}", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Trailing message window; `limit` 0 fetches the full history.
    pub async fn context(
        &self,
        debate_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, ApiClientError> {
        let response = self
            .http
            .get(format!(
                "{}/api/context/{debate_id}?limit={limit}",
                self.base_url
            ))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn transcript(&self, debate_id: &str) -> Result<DebateSnapshot, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/api/debate/{debate_id}", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn list_debates(&self) -> Result<Vec<DebateSummary>, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/api/debates", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }
}
