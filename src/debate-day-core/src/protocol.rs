//! The message protocol shared by every component.
//!
//! Defines the canonical shape of a debate utterance and of the system
//! announcement, and validates raw submissions before they reach state.
//! Everything here is a pure function over its inputs; the round number
//! always comes from the authoritative turn state, never from the
//! submitter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DebateError;

/// Participant roles in the debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Arguing in favor of the topic.
    Pro,
    /// Arguing against the topic.
    Con,
    /// Moderator; speaks once, to deliver the verdict.
    Mod,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Pro => "Pro",
            Role::Con => "Con",
            Role::Mod => "Moderator",
        }
    }

    /// Parse a role from its wire name (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_lowercase().as_str() {
            "pro" => Some(Role::Pro),
            "con" => Some(Role::Con),
            "mod" => Some(Role::Mod),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Pro => "pro",
            Role::Con => "con",
            Role::Mod => "mod",
        };
        f.write_str(name)
    }
}

/// Author of a message: one of the debate roles, or the system itself
/// (only the topic announcement).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Pro,
    Con,
    Mod,
    System,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Pro => MessageRole::Pro,
            Role::Con => MessageRole::Con,
            Role::Mod => MessageRole::Mod,
        }
    }
}

impl MessageRole {
    /// The participant role, if this is not a system message.
    pub fn as_role(&self) -> Option<Role> {
        match self {
            MessageRole::Pro => Some(Role::Pro),
            MessageRole::Con => Some(Role::Con),
            MessageRole::Mod => Some(Role::Mod),
            MessageRole::System => None,
        }
    }
}

/// What a message is, derived from who sent it and in which round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Opening position statement (pro, round 0).
    Argument,
    /// Direct challenge to the opening argument (con, round 0).
    Counter,
    /// Response in a rebuttal round.
    Rebuttal,
    /// The moderator's final judgment.
    Verdict,
    /// System message (topic announcement).
    System,
    /// Error marker preserved in the log.
    Error,
}

impl MessageKind {
    /// Classify a participant message from its role and round.
    pub fn classify(role: Role, round: u32) -> MessageKind {
        match role {
            Role::Mod => MessageKind::Verdict,
            _ if round > 0 => MessageKind::Rebuttal,
            Role::Pro => MessageKind::Argument,
            Role::Con => MessageKind::Counter,
        }
    }
}

/// A single utterance in a debate. Immutable once appended to the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    pub debate_id: String,
    pub message_id: String,
    /// Display name of the sender.
    pub sender: String,
    pub role: MessageRole,
    /// Round the message was spoken in; round 0 is the opening round.
    pub round: u32,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
    /// Open metadata map; a verdict carries the declared winner here.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

pub fn generate_debate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn generate_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reject a submission whose sender or content is empty after trimming.
pub fn check_submission(sender: &str, content: &str) -> Result<(), DebateError> {
    if sender.trim().is_empty() {
        return Err(DebateError::Validation {
            field: "sender",
            reason: "must not be empty".to_string(),
        });
    }
    if content.trim().is_empty() {
        return Err(DebateError::Validation {
            field: "content",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate a raw submission and build its canonical record.
pub fn build_message(
    debate_id: &str,
    sender: &str,
    role: Role,
    round: u32,
    content: &str,
    metadata: Map<String, Value>,
) -> Result<MessageRecord, DebateError> {
    check_submission(sender, content)?;
    Ok(MessageRecord {
        debate_id: debate_id.to_owned(),
        message_id: generate_message_id(),
        sender: sender.trim().to_owned(),
        role: role.into(),
        round,
        content: content.trim().to_owned(),
        kind: MessageKind::classify(role, round),
        timestamp: Utc::now(),
        metadata,
    })
}

/// The single system message carrying the topic, created at session start.
pub fn announcement(debate_id: &str, topic: &str) -> MessageRecord {
    let mut metadata = Map::new();
    metadata.insert("type".to_owned(), Value::from("topic"));
    MessageRecord {
        debate_id: debate_id.to_owned(),
        message_id: generate_message_id(),
        sender: "system".to_owned(),
        role: MessageRole::System,
        round: 0,
        content: topic.to_owned(),
        kind: MessageKind::System,
        timestamp: Utc::now(),
        metadata,
    }
}
