//! Configuration for the LLM move advisor.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Environment variable holding the OpenAI key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Anthropic key.
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Advisor settings, usually read from `advisor.toml`.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Whether the opponent should consult the LLM at all.
    #[serde(default = "default_enabled")]
    enabled: bool,

    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "claude-3-5-haiku-latest").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Base URL override for either provider, e.g. `http://localhost:11434/v1`.
    #[serde(default)]
    api_base: Option<String>,

    /// Seconds to wait for a reply before falling back to the heuristic.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            api_base: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AdvisorConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading advisor config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            enabled = config.enabled,
            provider = %config.llm_provider,
            model = %config.llm_model,
            "Advisor config loaded"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reply deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the LLM configuration, taking the API key from `lookup`.
    ///
    /// A configured `api_base` points at a self-hosted endpoint, so a missing
    /// key is tolerated there.
    #[instrument(skip(self, lookup), fields(provider = %self.llm_provider, model = %self.llm_model))]
    pub fn llm_config_with<F>(&self, lookup: F) -> Result<LlmConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = match self.llm_provider {
            LlmProvider::OpenAI => OPENAI_KEY_VAR,
            LlmProvider::Anthropic => ANTHROPIC_KEY_VAR,
        };

        let api_key = match (lookup(var), &self.api_base) {
            (Some(key), _) => key,
            (None, Some(_)) => {
                debug!(var, "No API key set, using custom endpoint without one");
                String::new()
            }
            (None, None) => {
                warn!(var, "API key not set");
                return Err(ConfigError::new(format!(
                    "{} environment variable not set",
                    var
                )));
            }
        };

        let config = LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        );
        Ok(match &self.api_base {
            Some(base) => config.with_api_base(base.clone()),
            None => config,
        })
    }

    /// Builds the LLM configuration from the process environment.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY.
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.llm_config_with(|var| std::env::var(var).ok())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
