//! Round-trippable debate export.
//!
//! A full debate as a single serializable document. The turn state is
//! deliberately not part of the export: reloading rebuilds it by
//! replaying the message log, which must (and does) reconstruct the
//! state the coordinator held.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DebateError;
use crate::protocol::{MessageRecord, Role};
use crate::session::{DebateSession, SessionStatus};
use crate::store::DebateSnapshot;
use crate::turn::TurnState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateExport {
    pub debate_id: String,
    pub topic: String,
    pub rounds: u32,
    pub status: SessionStatus,
    pub winner: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub messages: Vec<MessageRecord>,
}

impl From<DebateSnapshot> for DebateExport {
    fn from(snapshot: DebateSnapshot) -> Self {
        Self {
            debate_id: snapshot.session.debate_id,
            topic: snapshot.session.topic,
            rounds: snapshot.session.rounds,
            status: snapshot.session.status,
            winner: snapshot.session.winner,
            created_at: snapshot.session.created_at,
            finished_at: snapshot.session.finished_at,
            messages: snapshot.messages,
        }
    }
}

impl DebateExport {
    /// Split into storable parts, replaying the log for the turn state.
    pub fn into_parts(
        self,
    ) -> Result<(DebateSession, Vec<MessageRecord>, TurnState), DebateError> {
        if let Some(stray) = self.messages.iter().find(|m| m.debate_id != self.debate_id) {
            return Err(DebateError::Validation {
                field: "messages",
                reason: format!(
                    "message {} belongs to debate {}",
                    stray.message_id, stray.debate_id
                ),
            });
        }

        let turn = TurnState::replay(&self.debate_id, &self.messages, self.rounds);
        let updated_at = self
            .messages
            .last()
            .map(|m| m.timestamp)
            .unwrap_or(self.created_at);
        let session = DebateSession {
            debate_id: self.debate_id,
            topic: self.topic,
            rounds: self.rounds,
            status: self.status,
            created_at: self.created_at,
            updated_at,
            finished_at: self.finished_at,
            winner: self.winner,
        };
        Ok((session, self.messages, turn))
    }
}
