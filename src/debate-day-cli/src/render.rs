//! Colored transcript rendering for the terminal.

use colored::Colorize;

use debate_day_core::{DebateSession, MessageRecord, MessageRole};

pub fn print_message(msg: &MessageRecord) {
    match msg.role {
        MessageRole::System => {
            println!("{}", "═".repeat(70).bright_magenta());
            println!("{}", format!("  TOPIC: {}", msg.content).bright_magenta().bold());
            println!("{}", "═".repeat(70).bright_magenta());
            println!();
        }
        MessageRole::Pro => print_speech(msg, "PRO"),
        MessageRole::Con => print_speech(msg, "CON"),
        MessageRole::Mod => {
            println!(
                "{} {} {}",
                "▶".bright_yellow(),
                msg.sender.bright_yellow().bold(),
                "(VERDICT)".yellow()
            );
            print_wrapped(&msg.content);
        }
    }
}

fn print_speech(msg: &MessageRecord, side: &str) {
    let header = format!("{} ({side}, round {})", msg.sender, msg.round);
    let colored_header = match msg.role {
        MessageRole::Pro => header.bright_green().bold(),
        _ => header.bright_red().bold(),
    };
    println!("{} {}", "▶".bright_cyan(), colored_header);
    print_wrapped(&msg.content);
}

fn print_wrapped(content: &str) {
    for line in wrap(content, 66).lines() {
        println!("  {line}");
    }
    println!();
}

pub fn print_result(session: &DebateSession) {
    println!("{}", "═".repeat(70).bright_blue());
    match session.winner {
        Some(winner) => println!(
            "{}",
            format!("  Debate concluded. Winner: {}", winner.display_name())
                .bright_green()
                .bold()
        ),
        None => println!("{}", "  Debate concluded. No winner declared.".bright_green()),
    }
    println!("{}", "═".repeat(70).bright_blue());
}

/// Simple word wrap.
fn wrap(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_breaks_long_lines() {
        let text = "one two three four five";
        let wrapped = wrap(text, 10);
        assert!(wrapped.lines().all(|l| l.len() <= 10));
        assert_eq!(wrapped.split_whitespace().count(), 5);
    }

    #[test]
    fn test_wrap_short_text_unchanged() {
        assert_eq!(wrap("short", 20), "short");
    }
}
