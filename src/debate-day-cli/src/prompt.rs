//! Prompt construction for participant workers.
//!
//! Pure functions from the transcript to the text handed to the model.

use debate_day_core::{MessageRecord, MessageRole, Role};

/// The debate topic, taken from the round-0 system announcement.
pub fn topic_of(messages: &[MessageRecord]) -> &str {
    messages
        .iter()
        .find(|m| m.role == MessageRole::System && m.round == 0)
        .map(|m| m.content.as_str())
        .unwrap_or("Unknown Topic")
}

/// Format the participant messages as a readable history, grouped by
/// round. System messages are carried in the topic line, not here.
fn format_history(messages: &[MessageRecord]) -> String {
    let mut lines = Vec::new();
    let mut last_round = 0;
    for msg in messages {
        let Some(role) = msg.role.as_role() else {
            continue;
        };
        if msg.round > last_round {
            lines.push(format!("\n--- Round {} ---\n", msg.round));
            last_round = msg.round;
        }
        lines.push(format!("{}: {}", role.display_name(), msg.content));
    }
    lines.join("\n\n")
}

fn instructions(role: Role, round: u32) -> String {
    match role {
        Role::Pro if round == 0 => "You are arguing IN FAVOR of the topic. \
            Provide your initial argument in 2-3 sentences. Be clear, concise, \
            and persuasive; do not attack the opposing side yet."
            .to_string(),
        Role::Pro => format!(
            "You are arguing IN FAVOR of the topic. This is round {round}. \
            Respond to the Con's most recent point with a focused rebuttal."
        ),
        Role::Con if round == 0 => "You are arguing AGAINST the topic. \
            Provide your initial counter-argument in 2-3 sentences. Be clear, \
            concise, and persuasive."
            .to_string(),
        Role::Con => format!(
            "You are arguing AGAINST the topic. This is round {round}. \
            Respond to the Pro's most recent point with a focused rebuttal."
        ),
        Role::Mod => "You are the MODERATOR of this debate. Review the \
            arguments from both sides and declare a winner based on the \
            strength of their reasoning and evidence. You MUST state exactly \
            one of: 'I declare PRO as the winner.' or 'I declare CON as the \
            winner.' Provide a brief, impartial justification."
            .to_string(),
    }
}

/// Build the full prompt for a participant about to speak.
pub fn build_prompt(
    role: Role,
    name: &str,
    messages: &[MessageRecord],
    current_round: u32,
) -> String {
    let topic = topic_of(messages);
    let history = format_history(messages);
    let instructions = instructions(role, current_round);
    format!(
        "# Debate Topic: {topic}\n\n\
        ## Debate History:\n{history}\n\n\
        ## Instructions:\n\
        You are {name}, speaking as {side} in this debate.\n\
        {instructions}\n\n\
        Respond with ONLY your argument text - no role prefixes, no \
        meta-commentary.",
        side = role.display_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_day_core::protocol;
    use serde_json::Map;

    fn transcript() -> Vec<MessageRecord> {
        vec![
            protocol::announcement("d1", "Cats are better than dogs"),
            protocol::build_message("d1", "Ava", Role::Pro, 0, "Cats are independent.", Map::new())
                .unwrap(),
            protocol::build_message("d1", "Ben", Role::Con, 0, "Dogs are loyal.", Map::new())
                .unwrap(),
            protocol::build_message("d1", "Ava", Role::Pro, 1, "Loyalty is overrated.", Map::new())
                .unwrap(),
        ]
    }

    #[test]
    fn test_topic_from_announcement() {
        assert_eq!(topic_of(&transcript()), "Cats are better than dogs");
        assert_eq!(topic_of(&[]), "Unknown Topic");
    }

    #[test]
    fn test_history_groups_rounds_and_skips_system() {
        let history = format_history(&transcript());
        assert!(history.contains("Pro: Cats are independent."));
        assert!(history.contains("--- Round 1 ---"));
        assert!(!history.contains("Cats are better than dogs\n"));
    }

    #[test]
    fn test_opening_prompt_mentions_name_and_topic() {
        let prompt = build_prompt(Role::Con, "Ben", &transcript(), 0);
        assert!(prompt.contains("# Debate Topic: Cats are better than dogs"));
        assert!(prompt.contains("You are Ben"));
        assert!(prompt.contains("arguing AGAINST"));
    }

    #[test]
    fn test_rebuttal_prompt_names_the_round() {
        let prompt = build_prompt(Role::Pro, "Ava", &transcript(), 2);
        assert!(prompt.contains("This is round 2"));
    }

    #[test]
    fn test_moderator_prompt_demands_declaration() {
        let prompt = build_prompt(Role::Mod, "Max", &transcript(), 1);
        assert!(prompt.contains("I declare PRO as the winner."));
        assert!(prompt.contains("I declare CON as the winner."));
    }
}
