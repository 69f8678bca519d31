//! Agent worker configuration.
//!
//! A small TOML file with environment overrides; every field has a
//! sensible default so a config file is optional.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model to generate with (e.g. "gpt-4o-mini", "llama3:8b").
    pub model: String,
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    pub api_key: String,
    /// Seconds between turn polls.
    pub poll_interval_secs: u64,
    /// Response length hint per turn.
    pub max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            poll_interval_secs: 10,
            max_tokens: 400,
        }
    }
}

impl AgentConfig {
    /// Load from a TOML file when given, defaults otherwise, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(base) = env::var("OPENAI_API_BASE").or_else(|_| env::var("OPENAI_BASE_URL")) {
            self.api_base = base;
        }
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            self.api_key = key;
        }
        if let Ok(model) = env::var("DEBATE_MODEL") {
            self.model = model;
        }
    }
}
