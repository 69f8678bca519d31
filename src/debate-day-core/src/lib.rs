//! Debate Day Core Library
//!
//! Turn coordination for a two-advocate debate with a moderator: the
//! message protocol, the turn state machine, session storage, and the
//! coordination service that ties them together.

pub mod coordinator;
pub mod error;
pub mod export;
pub mod lock;
pub mod protocol;
pub mod session;
pub mod store;
pub mod turn;

pub use coordinator::{Coordinator, CreateDebate, SubmitMessage};
pub use error::DebateError;
pub use export::DebateExport;
pub use protocol::{MessageKind, MessageRecord, MessageRole, Role};
pub use session::{DebateSession, DebateSummary, SessionStatus};
pub use store::{DebateSnapshot, MemoryStore, SessionStore, TurnCommit};
pub use turn::{Speaker, TurnState, advance};
