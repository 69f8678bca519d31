//! Session storage.
//!
//! One record per debate id holds the session, the ordered message log,
//! and the turn state together, so a reader always observes a message
//! append and the matching turn advance as a single step. Records for
//! different debate ids never share a lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::DebateError;
use crate::protocol::{MessageRecord, Role};
use crate::session::{DebateSession, DebateSummary, SessionStatus};
use crate::turn::TurnState;

/// Consistent read of a debate's full state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSnapshot {
    pub session: DebateSession,
    pub messages: Vec<MessageRecord>,
    pub turn: TurnState,
}

/// Everything committed together with an accepted message.
#[derive(Debug, Clone)]
pub struct TurnCommit {
    pub message: MessageRecord,
    pub turn: TurnState,
    pub status: Option<SessionStatus>,
    pub winner: Option<Role>,
}

/// Associative storage for debate state.
///
/// `commit` applies the message append and the accompanying turn and
/// status updates atomically with respect to every other operation on
/// the same debate id. Operations on different ids are independent.
pub trait SessionStore: Send + Sync {
    /// Store a new session with its announcement and initial turn state.
    fn create(
        &self,
        session: DebateSession,
        announcement: MessageRecord,
        turn: TurnState,
    ) -> Result<(), DebateError>;

    /// Insert a fully formed record (used when reloading an export).
    fn restore(
        &self,
        session: DebateSession,
        messages: Vec<MessageRecord>,
        turn: TurnState,
    ) -> Result<(), DebateError>;

    fn session(&self, debate_id: &str) -> Option<DebateSession>;

    fn turn(&self, debate_id: &str) -> Option<TurnState>;

    fn messages(&self, debate_id: &str) -> Option<Vec<MessageRecord>>;

    fn snapshot(&self, debate_id: &str) -> Option<DebateSnapshot>;

    fn list(&self) -> Vec<DebateSummary>;

    /// Append an accepted message and its state updates as one step.
    fn commit(&self, debate_id: &str, commit: TurnCommit) -> Result<(), DebateError>;
}

#[derive(Debug)]
struct DebateRecord {
    session: DebateSession,
    messages: Vec<MessageRecord>,
    turn: TurnState,
}

/// In-memory `SessionStore`; the backing store for the single-process
/// server and for tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Arc<Mutex<DebateRecord>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, debate_id: &str) -> Option<Arc<Mutex<DebateRecord>>> {
        self.records.read().get(debate_id).cloned()
    }

    fn insert(
        &self,
        session: DebateSession,
        messages: Vec<MessageRecord>,
        turn: TurnState,
    ) -> Result<(), DebateError> {
        let mut records = self.records.write();
        if records.contains_key(&session.debate_id) {
            return Err(DebateError::Conflict(session.debate_id.clone()));
        }
        let debate_id = session.debate_id.clone();
        let record = DebateRecord {
            session,
            messages,
            turn,
        };
        records.insert(debate_id, Arc::new(Mutex::new(record)));
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn create(
        &self,
        session: DebateSession,
        announcement: MessageRecord,
        turn: TurnState,
    ) -> Result<(), DebateError> {
        self.insert(session, vec![announcement], turn)
    }

    fn restore(
        &self,
        session: DebateSession,
        messages: Vec<MessageRecord>,
        turn: TurnState,
    ) -> Result<(), DebateError> {
        self.insert(session, messages, turn)
    }

    fn session(&self, debate_id: &str) -> Option<DebateSession> {
        self.record(debate_id).map(|r| r.lock().session.clone())
    }

    fn turn(&self, debate_id: &str) -> Option<TurnState> {
        self.record(debate_id).map(|r| r.lock().turn.clone())
    }

    fn messages(&self, debate_id: &str) -> Option<Vec<MessageRecord>> {
        self.record(debate_id).map(|r| r.lock().messages.clone())
    }

    fn snapshot(&self, debate_id: &str) -> Option<DebateSnapshot> {
        self.record(debate_id).map(|r| {
            let record = r.lock();
            DebateSnapshot {
                session: record.session.clone(),
                messages: record.messages.clone(),
                turn: record.turn.clone(),
            }
        })
    }

    fn list(&self) -> Vec<DebateSummary> {
        let records = self.records.read();
        let mut summaries: Vec<DebateSummary> = records
            .values()
            .map(|r| DebateSummary::from(&r.lock().session))
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    fn commit(&self, debate_id: &str, commit: TurnCommit) -> Result<(), DebateError> {
        let record = self
            .record(debate_id)
            .ok_or_else(|| DebateError::NotFound(debate_id.to_owned()))?;
        let mut record = record.lock();
        let now = chrono::Utc::now();

        record.messages.push(commit.message);
        record.turn = commit.turn;
        record.session.updated_at = now;
        if let Some(status) = commit.status {
            record.session.status = status;
            if status == SessionStatus::Finished {
                record.session.finished_at = Some(now);
            }
        }
        if let Some(winner) = commit.winner {
            record.session.winner = Some(winner);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{self, Role};

    fn seeded(store: &MemoryStore, debate_id: &str, rounds: u32) {
        let session = DebateSession::new(debate_id, "Topic", rounds);
        let announcement = protocol::announcement(debate_id, "Topic");
        let turn = TurnState::initial(debate_id);
        store.create(session, announcement, turn).unwrap();
    }

    #[test]
    fn test_create_then_read_back() {
        let store = MemoryStore::new();
        seeded(&store, "d1", 1);

        let session = store.session("d1").unwrap();
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(store.messages("d1").unwrap().len(), 1);
        assert_eq!(store.turn("d1").unwrap(), TurnState::initial("d1"));
    }

    #[test]
    fn test_create_duplicate_id_is_conflict() {
        let store = MemoryStore::new();
        seeded(&store, "d1", 1);

        let session = DebateSession::new("d1", "Other", 0);
        let announcement = protocol::announcement("d1", "Other");
        let err = store
            .create(session, announcement, TurnState::initial("d1"))
            .unwrap_err();
        assert!(matches!(err, DebateError::Conflict(_)));
    }

    #[test]
    fn test_commit_applies_message_turn_and_status_together() {
        let store = MemoryStore::new();
        seeded(&store, "d1", 0);

        let msg = protocol::build_message("d1", "Ava", Role::Pro, 0, "Opening", Default::default())
            .unwrap();
        let turn = store.turn("d1").unwrap().after(&msg, 0);
        store
            .commit(
                "d1",
                TurnCommit {
                    message: msg.clone(),
                    turn: turn.clone(),
                    status: Some(SessionStatus::Active),
                    winner: None,
                },
            )
            .unwrap();

        let snapshot = store.snapshot("d1").unwrap();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.turn, turn);
        assert_eq!(snapshot.session.status, SessionStatus::Active);
        assert_eq!(
            snapshot.turn.last_message_id.as_deref(),
            Some(msg.message_id.as_str())
        );
    }

    #[test]
    fn test_commit_finished_sets_finished_at_and_winner() {
        let store = MemoryStore::new();
        seeded(&store, "d1", 0);

        let msg = protocol::build_message("d1", "Max", Role::Mod, 0, "Verdict", Default::default())
            .unwrap();
        let turn = store.turn("d1").unwrap().after(&msg, 0);
        store
            .commit(
                "d1",
                TurnCommit {
                    message: msg,
                    turn,
                    status: Some(SessionStatus::Finished),
                    winner: Some(Role::Pro),
                },
            )
            .unwrap();

        let session = store.session("d1").unwrap();
        assert_eq!(session.status, SessionStatus::Finished);
        assert!(session.finished_at.is_some());
        assert_eq!(session.winner, Some(Role::Pro));
    }

    #[test]
    fn test_commit_unknown_debate_is_not_found() {
        let store = MemoryStore::new();
        let msg = protocol::build_message("nope", "Ava", Role::Pro, 0, "x", Default::default())
            .unwrap();
        let err = store
            .commit(
                "nope",
                TurnCommit {
                    message: msg,
                    turn: TurnState::initial("nope"),
                    status: None,
                    winner: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, DebateError::NotFound(_)));
    }

    #[test]
    fn test_debates_are_independent() {
        let store = MemoryStore::new();
        seeded(&store, "d1", 0);
        seeded(&store, "d2", 2);

        let msg = protocol::build_message("d1", "Ava", Role::Pro, 0, "x", Default::default())
            .unwrap();
        let turn = store.turn("d1").unwrap().after(&msg, 0);
        store
            .commit(
                "d1",
                TurnCommit {
                    message: msg,
                    turn,
                    status: Some(SessionStatus::Active),
                    winner: None,
                },
            )
            .unwrap();

        assert_eq!(store.messages("d1").unwrap().len(), 2);
        assert_eq!(store.messages("d2").unwrap().len(), 1);
        assert_eq!(store.session("d2").unwrap().status, SessionStatus::Pending);
        assert_eq!(store.list().len(), 2);
    }
}
