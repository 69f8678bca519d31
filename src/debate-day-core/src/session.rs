//! Debate session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::Role;

/// Status of a debate session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created; no participant message accepted yet.
    Pending,
    /// At least one participant message accepted.
    Active,
    /// The verdict has been accepted. Terminal.
    Finished,
    /// Marked failed by external supervision. Terminal.
    Error,
}

/// One debate instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebateSession {
    pub debate_id: String,
    pub topic: String,
    /// Rebuttal rounds after the opening round. Zero is valid and means
    /// opening statements straight to judgment.
    pub rounds: u32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Winner declared by the verdict, if any.
    pub winner: Option<Role>,
}

impl DebateSession {
    pub fn new(debate_id: impl Into<String>, topic: impl Into<String>, rounds: u32) -> Self {
        let now = Utc::now();
        Self {
            debate_id: debate_id.into(),
            topic: topic.into(),
            rounds,
            status: SessionStatus::Pending,
            created_at: now,
            updated_at: now,
            finished_at: None,
            winner: None,
        }
    }
}

/// Compact listing entry for debate enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSummary {
    pub debate_id: String,
    pub topic: String,
    pub rounds: u32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub winner: Option<Role>,
}

impl From<&DebateSession> for DebateSummary {
    fn from(session: &DebateSession) -> Self {
        Self {
            debate_id: session.debate_id.clone(),
            topic: session.topic.clone(),
            rounds: session.rounds,
            status: session.status,
            created_at: session.created_at,
            winner: session.winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_pending() {
        let session = DebateSession::new("d1", "Topic", 2);
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.rounds, 2);
        assert!(session.winner.is_none());
        assert!(session.finished_at.is_none());
    }

    #[test]
    fn test_summary_carries_session_fields() {
        let mut session = DebateSession::new("d1", "Topic", 1);
        session.winner = Some(Role::Con);
        let summary = DebateSummary::from(&session);
        assert_eq!(summary.debate_id, "d1");
        assert_eq!(summary.winner, Some(Role::Con));
    }
}
