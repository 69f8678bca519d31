//! Content generation for participant workers.
//!
//! The coordination core treats generation as an external collaborator:
//! a function from a prompt to text. `OpenAiGenerator` implements it
//! against any OpenAI-compatible chat API with bounded retries; tests
//! use a canned generator instead.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use regex::Regex;

use debate_day_core::Role;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("model returned an empty response after {0} attempts")]
    Empty(usize),
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Generator backed by an OpenAI-compatible chat endpoint.
pub struct OpenAiGenerator {
    model: String,
    max_tokens: u32,
    client: Client<OpenAIConfig>,
}

impl OpenAiGenerator {
    pub fn new(model: &str, api_base: &str, api_key: &str, max_tokens: u32) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            model: model.to_owned(),
            max_tokens,
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_completion_tokens(self.max_tokens)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: prompt.to_owned().into(),
                    name: None,
                },
            )])
            .build()?;

        // Retry transient failures and empty replies with exponential
        // backoff: 1s, 2s, 4s.
        let max_retries = 3;
        let mut last_error = None;
        for attempt in 0..max_retries {
            if attempt > 0 {
                let delay = std::time::Duration::from_secs(1 << attempt);
                tokio::time::sleep(delay).await;
            }
            match self.client.chat().create(request.clone()).await {
                Ok(response) => {
                    let content = response
                        .choices
                        .first()
                        .and_then(|c| c.message.content.clone())
                        .unwrap_or_default();
                    let cleaned = sanitize_reply(&content);
                    if !cleaned.is_empty() {
                        return Ok(cleaned);
                    }
                    tracing::warn!(attempt, "empty model response, retrying");
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "generation failed, retrying");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .map(GenerateError::from)
            .unwrap_or(GenerateError::Empty(max_retries)))
    }
}

/// Clean a raw model reply into plain spoken text.
///
/// Strips reasoning/XML-ish tags and their content, role prefixes like
/// "Pro:", markdown artifacts, and collapses whitespace.
pub fn sanitize_reply(reply: &str) -> String {
    let mut text = reply.to_string();

    let tags_to_strip = ["thinking", "think", "reasoning", "reflection", "response"];
    for tag in &tags_to_strip {
        // For reasoning tags the content goes too; <response> wrappers
        // keep their content (only the tags are removed below).
        if *tag != "response" {
            let pattern = format!(r"(?is)<{tag}[^>]*>.*?</{tag}>");
            if let Ok(re) = Regex::new(&pattern) {
                text = re.replace_all(&text, "").to_string();
            }
        }
    }
    if let Ok(orphan_re) = Regex::new(r"</?[\w]+[^>]*>") {
        text = orphan_re.replace_all(&text, "").to_string();
    }

    // Leading role prefixes ("Pro:", "Moderator:").
    if let Ok(prefix_re) = Regex::new(r"^\s*(?i:pro|con|mod|moderator)\s*:\s*") {
        text = prefix_re.replace(&text, "").to_string();
    }

    // Markdown emphasis and headers.
    text = text.replace('*', "");
    if let Ok(header_re) = Regex::new(r"(?m)^#+\s*") {
        text = header_re.replace_all(&text, "").to_string();
    }

    if let Ok(ws_re) = Regex::new(r"\s+") {
        text = ws_re.replace_all(&text, " ").to_string();
    }

    text.trim().to_string()
}

/// Extract the winner a verdict declares, if any.
///
/// Accepts "I declare PRO as the winner" phrasing as well as
/// "... pro as the winner", case-insensitive.
pub fn parse_winner(verdict: &str) -> Option<Role> {
    let re = Regex::new(r"(?i)\bdeclare\s+(pro|con)\b|\b(pro|con)\s+as\s+the\s+winner\b").ok()?;
    let caps = re.captures(verdict)?;
    let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Role::parse(name)
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Generator returning fixed text; for loop and prompt tests.
    pub struct CannedGenerator(pub String);

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok(self.0.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_thinking_tags() {
        let input = "<thinking>Let me think...</thinking>The answer is clear.";
        assert_eq!(sanitize_reply(input), "The answer is clear.");
    }

    #[test]
    fn test_sanitize_keeps_response_tag_content() {
        let input = "<response>Dogs are loyal companions.</response>";
        assert_eq!(sanitize_reply(input), "Dogs are loyal companions.");
    }

    #[test]
    fn test_sanitize_strips_role_prefix_and_markdown() {
        let input = "Pro: **Cats** are *better*.";
        assert_eq!(sanitize_reply(input), "Cats are better.");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        let input = "One.\n\n  Two.";
        assert_eq!(sanitize_reply(input), "One. Two.");
    }

    #[test]
    fn test_parse_winner_declare_phrasing() {
        assert_eq!(parse_winner("I declare PRO as the winner."), Some(Role::Pro));
        assert_eq!(parse_winner("After review, I declare con the victor... con as the winner."), Some(Role::Con));
    }

    #[test]
    fn test_parse_winner_absent() {
        assert_eq!(parse_winner("Both sides argued well."), None);
    }
}
