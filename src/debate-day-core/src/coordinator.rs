//! The coordination service.
//!
//! The externally callable authority for debate sessions. Owns all
//! mutation of sessions, message logs, and turn state; participants and
//! viewers only read. A submission either fully succeeds (message
//! appended, turn advanced, status updated) or fully fails with no
//! visible change.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::DebateError;
use crate::export::DebateExport;
use crate::lock::DebateLockMap;
use crate::protocol::{self, MessageRecord, Role};
use crate::session::{DebateSession, DebateSummary, SessionStatus};
use crate::store::{DebateSnapshot, SessionStore, TurnCommit};
use crate::turn::TurnState;

/// Parameters for creating a debate.
#[derive(Debug, Clone)]
pub struct CreateDebate {
    pub topic: String,
    /// Rebuttal rounds after the opening round.
    pub rounds: u32,
    /// Caller-supplied id; generated when absent.
    pub debate_id: Option<String>,
}

/// A participant's submission.
#[derive(Debug, Clone)]
pub struct SubmitMessage {
    pub sender: String,
    pub role: Role,
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl SubmitMessage {
    pub fn new(sender: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            role,
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Coordinates debates stored in a [`SessionStore`].
pub struct Coordinator {
    store: Arc<dyn SessionStore>,
    locks: DebateLockMap,
}

impl Coordinator {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            locks: DebateLockMap::new(),
        }
    }

    /// Create a session: topic announcement at round 0, pro to open.
    pub async fn create_debate(&self, req: CreateDebate) -> Result<DebateSession, DebateError> {
        if req.topic.trim().is_empty() {
            return Err(DebateError::Validation {
                field: "topic",
                reason: "must not be empty".to_string(),
            });
        }
        let debate_id = req
            .debate_id
            .unwrap_or_else(protocol::generate_debate_id);

        let _guard = self.locks.acquire(&debate_id).await;
        let session = DebateSession::new(&debate_id, req.topic.trim(), req.rounds);
        let announcement = protocol::announcement(&debate_id, &session.topic);
        let turn = TurnState::initial(&debate_id);
        self.store.create(session.clone(), announcement, turn)?;

        tracing::info!(debate_id = %debate_id, rounds = req.rounds, "debate created");
        Ok(session)
    }

    /// Accept a message if and only if its role holds the current turn.
    pub async fn submit_message(
        &self,
        debate_id: &str,
        req: SubmitMessage,
    ) -> Result<MessageRecord, DebateError> {
        // Shape problems are rejected before any state is consulted.
        protocol::check_submission(&req.sender, &req.content)?;

        let _guard = self.locks.acquire(debate_id).await;

        let session = self
            .store
            .session(debate_id)
            .ok_or_else(|| DebateError::NotFound(debate_id.to_owned()))?;
        if session.status == SessionStatus::Finished {
            return Err(DebateError::DebateFinished(debate_id.to_owned()));
        }
        let turn = self.store.turn(debate_id).ok_or_else(|| {
            DebateError::Internal(format!("no turn state for debate {debate_id}"))
        })?;
        if turn.next_speaker.role() != Some(req.role) {
            return Err(DebateError::TurnViolation {
                expected: turn.next_speaker,
                submitted: req.role,
            });
        }

        let message = protocol::build_message(
            debate_id,
            &req.sender,
            req.role,
            turn.current_round,
            &req.content,
            req.metadata,
        )?;
        let next = turn.after(&message, session.rounds);

        let mut status = None;
        let mut winner = None;
        if req.role == Role::Mod {
            status = Some(SessionStatus::Finished);
            winner = declared_winner(&message);
        } else if session.status == SessionStatus::Pending {
            status = Some(SessionStatus::Active);
        }

        let accepted = message.clone();
        self.store.commit(
            debate_id,
            TurnCommit {
                message,
                turn: next.clone(),
                status,
                winner,
            },
        )?;

        tracing::debug!(
            debate_id,
            role = %req.role,
            round = accepted.round,
            next_speaker = %next.next_speaker,
            "message accepted"
        );
        Ok(accepted)
    }

    /// Current turn state of a debate.
    pub fn turn(&self, debate_id: &str) -> Result<TurnState, DebateError> {
        self.store
            .turn(debate_id)
            .ok_or_else(|| DebateError::NotFound(debate_id.to_owned()))
    }

    /// Consistent snapshot of session, transcript, and turn state.
    pub fn transcript(&self, debate_id: &str) -> Result<DebateSnapshot, DebateError> {
        self.store
            .snapshot(debate_id)
            .ok_or_else(|| DebateError::NotFound(debate_id.to_owned()))
    }

    pub fn list_debates(&self) -> Vec<DebateSummary> {
        self.store.list()
    }

    /// Round-trippable export of one debate.
    pub fn export(&self, debate_id: &str) -> Result<DebateExport, DebateError> {
        self.transcript(debate_id).map(DebateExport::from)
    }

    /// Load an exported debate, rebuilding its turn state by replaying
    /// the log. Fails with `Conflict` if the id is already in use.
    pub async fn import(&self, export: DebateExport) -> Result<DebateSession, DebateError> {
        let (session, messages, turn) = export.into_parts()?;
        let _guard = self.locks.acquire(&session.debate_id).await;
        self.store.restore(session.clone(), messages, turn)?;
        tracing::info!(debate_id = %session.debate_id, "debate imported");
        Ok(session)
    }
}

/// The winner a verdict declares in its metadata, if any.
///
/// Only `"pro"` and `"con"` are meaningful; anything else leaves the
/// winner unset rather than rejecting the verdict.
fn declared_winner(message: &MessageRecord) -> Option<Role> {
    let declared = message.metadata.get("winner")?.as_str()?;
    match Role::parse(declared) {
        Some(Role::Mod) | None => None,
        role => role,
    }
}
