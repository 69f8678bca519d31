//! The turn state machine.
//!
//! `advance` is the single authoritative transition function. Every
//! mutating path in the coordinator goes through it; the next-speaker
//! rule is never recomputed inline anywhere else.

use serde::{Deserialize, Serialize};

use crate::protocol::{MessageRecord, MessageRole, Role};

/// Who holds the floor next. `Done` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Pro,
    Con,
    Mod,
    Done,
}

impl Speaker {
    /// The role allowed to submit, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Speaker::Pro => Some(Role::Pro),
            Speaker::Con => Some(Role::Con),
            Speaker::Mod => Some(Role::Mod),
            Speaker::Done => None,
        }
    }
}

impl From<Role> for Speaker {
    fn from(role: Role) -> Self {
        match role {
            Role::Pro => Speaker::Pro,
            Role::Con => Speaker::Con,
            Role::Mod => Speaker::Mod,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Speaker::Pro => "pro",
            Speaker::Con => "con",
            Speaker::Mod => "mod",
            Speaker::Done => "done",
        };
        f.write_str(name)
    }
}

/// Compute who speaks next after `speaker` spoke in `round`, given the
/// configured rebuttal-round budget.
///
/// Pro always hands to con in the same round. Con hands to pro in the
/// next round until the budget is exhausted, then to the moderator. The
/// moderator hands to `Done`, and `Done` absorbs further calls so late
/// or duplicate advances are no-ops.
pub fn advance(speaker: Speaker, round: u32, rounds: u32) -> (Speaker, u32) {
    match speaker {
        Speaker::Pro => (Speaker::Con, round),
        Speaker::Con => {
            if round >= rounds {
                (Speaker::Mod, round)
            } else {
                (Speaker::Pro, round + 1)
            }
        }
        Speaker::Mod => (Speaker::Done, round),
        Speaker::Done => (Speaker::Done, round),
    }
}

/// Whose turn it is in a debate.
///
/// Owned exclusively by the coordinator; recomputed transactionally on
/// every accepted message and only ever read by participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnState {
    pub debate_id: String,
    pub current_round: u32,
    pub next_speaker: Speaker,
    /// Id of the last accepted participant message.
    pub last_message_id: Option<String>,
    /// True iff the next speaker is the moderator.
    pub is_final_turn: bool,
}

impl TurnState {
    /// Initial state at session creation: pro opens round 0.
    pub fn initial(debate_id: &str) -> Self {
        Self {
            debate_id: debate_id.to_owned(),
            current_round: 0,
            next_speaker: Speaker::Pro,
            last_message_id: None,
            is_final_turn: false,
        }
    }

    /// The state after `message` is accepted in a debate with `rounds`
    /// rebuttal rounds. The announcement does not consume a turn.
    pub fn after(&self, message: &MessageRecord, rounds: u32) -> TurnState {
        let speaker = match message.role {
            MessageRole::Pro => Speaker::Pro,
            MessageRole::Con => Speaker::Con,
            MessageRole::Mod => Speaker::Mod,
            MessageRole::System => return self.clone(),
        };
        let (next_speaker, current_round) = advance(speaker, message.round, rounds);
        TurnState {
            debate_id: self.debate_id.clone(),
            current_round,
            next_speaker,
            last_message_id: Some(message.message_id.clone()),
            is_final_turn: next_speaker == Speaker::Mod,
        }
    }

    /// Rebuild the turn state by replaying the message log from the
    /// initial state. Agrees with the stored state for every prefix of
    /// the accepted log.
    pub fn replay<'a, I>(debate_id: &str, messages: I, rounds: u32) -> TurnState
    where
        I: IntoIterator<Item = &'a MessageRecord>,
    {
        let mut state = TurnState::initial(debate_id);
        for message in messages {
            state = state.after(message, rounds);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;
    use serde_json::Map;

    #[test]
    fn test_advance_pro_hands_to_con_same_round() {
        assert_eq!(advance(Speaker::Pro, 0, 0), (Speaker::Con, 0));
        assert_eq!(advance(Speaker::Pro, 2, 5), (Speaker::Con, 2));
    }

    #[test]
    fn test_advance_zero_budget_goes_straight_to_mod() {
        // Opening statements only, then judgment.
        assert_eq!(advance(Speaker::Con, 0, 0), (Speaker::Mod, 0));
    }

    #[test]
    fn test_advance_two_round_budget() {
        assert_eq!(advance(Speaker::Con, 0, 2), (Speaker::Pro, 1));
        assert_eq!(advance(Speaker::Con, 1, 2), (Speaker::Pro, 2));
        assert_eq!(advance(Speaker::Con, 2, 2), (Speaker::Mod, 2));
    }

    #[test]
    fn test_advance_mod_then_done_is_absorbing() {
        assert_eq!(advance(Speaker::Mod, 1, 1), (Speaker::Done, 1));
        assert_eq!(advance(Speaker::Done, 1, 1), (Speaker::Done, 1));
        assert_eq!(advance(Speaker::Done, 1, 1), (Speaker::Done, 1));
    }

    #[test]
    fn test_initial_state() {
        let state = TurnState::initial("d1");
        assert_eq!(state.next_speaker, Speaker::Pro);
        assert_eq!(state.current_round, 0);
        assert!(!state.is_final_turn);
        assert!(state.last_message_id.is_none());
    }

    #[test]
    fn test_after_marks_final_turn_before_verdict() {
        let state = TurnState::initial("d1");
        let pro = protocol::build_message("d1", "a", Role::Pro, 0, "x", Map::new()).unwrap();
        let con = protocol::build_message("d1", "b", Role::Con, 0, "y", Map::new()).unwrap();

        let state = state.after(&pro, 0);
        assert_eq!(state.next_speaker, Speaker::Con);
        let state = state.after(&con, 0);
        assert_eq!(state.next_speaker, Speaker::Mod);
        assert!(state.is_final_turn);
        assert_eq!(state.last_message_id.as_deref(), Some(con.message_id.as_str()));
    }

    #[test]
    fn test_announcement_does_not_consume_a_turn() {
        let state = TurnState::initial("d1");
        let topic = protocol::announcement("d1", "T");
        assert_eq!(state.after(&topic, 3), state);
    }

    #[test]
    fn test_replay_full_debate() {
        let mut messages = vec![protocol::announcement("d1", "T")];
        let mut state = TurnState::initial("d1");
        let senders = [
            (Role::Pro, 0),
            (Role::Con, 0),
            (Role::Pro, 1),
            (Role::Con, 1),
            (Role::Mod, 1),
        ];
        for (role, round) in senders {
            let msg = protocol::build_message("d1", "s", role, round, "c", Map::new()).unwrap();
            state = state.after(&msg, 1);
            messages.push(msg);
            // Every prefix of the log reconstructs the current state.
            assert_eq!(TurnState::replay("d1", &messages, 1), state);
        }
        assert_eq!(state.next_speaker, Speaker::Done);
    }
}
