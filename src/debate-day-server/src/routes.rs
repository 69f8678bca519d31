//! API routes over the coordinator.
//!
//! - `POST /api/start`               — create a debate
//! - `POST /api/message/:debate_id`  — submit a participant message
//! - `GET  /api/turn/:debate_id`     — whose turn it is
//! - `GET  /api/context/:debate_id`  — trailing message window
//! - `GET  /api/status/:debate_id`   — status summary
//! - `GET  /api/debate/:debate_id`   — full transcript snapshot
//! - `GET  /api/debates`             — list all debates
//! - `GET  /api/export/:debate_id`   — round-trippable export

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;

use debate_day_core::{
    Coordinator, CreateDebate, DebateSession, MessageRecord, Role, SessionStatus, Speaker,
    SubmitMessage,
};

use crate::error::ApiError;

pub type AppState = Arc<Coordinator>;

pub fn router(coordinator: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/start", post(start_debate))
        .route("/api/message/:debate_id", post(add_message))
        .route("/api/turn/:debate_id", get(get_turn))
        .route("/api/context/:debate_id", get(get_context))
        .route("/api/status/:debate_id", get(get_status))
        .route("/api/debate/:debate_id", get(get_debate))
        .route("/api/debates", get(list_debates))
        .route("/api/export/:debate_id", get(export_debate))
        .layer(TraceLayer::new_for_http())
        .with_state(coordinator)
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartDebateRequest {
    pub topic: String,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub debate_id: Option<String>,
}

fn default_rounds() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    pub sender: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub debate_id: String,
    pub current_round: u32,
    pub next_speaker: Speaker,
    pub is_final_turn: bool,
    pub status: SessionStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub debate_id: String,
    pub topic: String,
    pub status: SessionStatus,
    pub current_round: u32,
    pub next_speaker: Speaker,
    pub message_count: usize,
    pub winner: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn start_debate(
    State(coordinator): State<AppState>,
    Json(req): Json<StartDebateRequest>,
) -> Result<(StatusCode, Json<DebateSession>), ApiError> {
    let session = coordinator
        .create_debate(CreateDebate {
            topic: req.topic,
            rounds: req.rounds,
            debate_id: req.debate_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn add_message(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
    Json(req): Json<AddMessageRequest>,
) -> Result<Json<MessageRecord>, ApiError> {
    let message = coordinator
        .submit_message(
            &debate_id,
            SubmitMessage {
                sender: req.sender,
                role: req.role,
                content: req.content,
                metadata: req.metadata,
            },
        )
        .await?;
    Ok(Json(message))
}

async fn get_turn(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
) -> Result<Json<TurnResponse>, ApiError> {
    let snapshot = coordinator.transcript(&debate_id)?;
    Ok(Json(TurnResponse {
        debate_id,
        current_round: snapshot.turn.current_round,
        next_speaker: snapshot.turn.next_speaker,
        is_final_turn: snapshot.turn.is_final_turn,
        status: snapshot.session.status,
    }))
}

async fn get_context(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    let mut messages = coordinator.transcript(&debate_id)?.messages;
    if query.limit > 0 && query.limit < messages.len() {
        messages = messages.split_off(messages.len() - query.limit);
    }
    Ok(Json(messages))
}

async fn get_status(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = coordinator.transcript(&debate_id)?;
    Ok(Json(StatusResponse {
        debate_id,
        topic: snapshot.session.topic,
        status: snapshot.session.status,
        current_round: snapshot.turn.current_round,
        next_speaker: snapshot.turn.next_speaker,
        message_count: snapshot.messages.len(),
        winner: snapshot.session.winner,
    }))
}

async fn get_debate(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = coordinator.transcript(&debate_id)?;
    Ok(Json(snapshot))
}

async fn list_debates(State(coordinator): State<AppState>) -> impl IntoResponse {
    Json(coordinator.list_debates())
}

async fn export_debate(
    State(coordinator): State<AppState>,
    Path(debate_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(coordinator.export(&debate_id)?))
}
