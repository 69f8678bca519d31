//! Error types for the debate coordination service.

use thiserror::Error;

use crate::protocol::Role;
use crate::turn::Speaker;

#[derive(Error, Debug)]
pub enum DebateError {
    /// Malformed submission, rejected before any state is touched.
    #[error("invalid message: {field} {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("debate not found: {0}")]
    NotFound(String),

    #[error("debate id already in use: {0}")]
    Conflict(String),

    /// Submission from a role that does not hold the current turn.
    ///
    /// Expected and frequent under polling: a participant asks too early,
    /// or two participants race for the same slot. Callers back off and
    /// poll again; the coordinator never treats this as a fault.
    #[error("it is not {submitted}'s turn to speak (next speaker: {expected})")]
    TurnViolation { expected: Speaker, submitted: Role },

    #[error("debate {0} is finished; no further messages are accepted")]
    DebateFinished(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DebateError {
    /// Stable machine-readable kind, used in transport error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DebateError::Validation { .. } => "validation",
            DebateError::NotFound(_) => "not_found",
            DebateError::Conflict(_) => "conflict",
            DebateError::TurnViolation { .. } => "turn_violation",
            DebateError::DebateFinished(_) => "debate_finished",
            DebateError::Internal(_) => "internal",
        }
    }
}
