//! Chat completion client for the move advisor.
//!
//! One [`LlmClient`] owns a backend built from its [`LlmConfig`]: an
//! `async-openai` client for OpenAI-compatible servers, or a plain HTTP
//! client posting to the Anthropic messages endpoint. `api_base` is a base
//! URL for both providers (e.g. `http://localhost:11434/v1`).

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI, or any server speaking the OpenAI chat API (e.g. a local Ollama).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Provider, credentials and limits for one client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_base: Option<String>,
}

impl LlmConfig {
    /// Config for `model` on `provider` at the provider's public endpoint.
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            api_base: None,
        }
    }

    /// Replaces the provider's base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Default reply budget in tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }
}

/// A single-turn chat request: system prompt plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    system: String,
    user: String,
    max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: None,
        }
    }

    /// Overrides the configured reply budget for this request.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn budget(&self, config: &LlmConfig) -> u32 {
        self.max_tokens.unwrap_or(config.max_tokens)
    }
}

#[derive(Debug, Clone)]
enum Backend {
    OpenAI(OpenAIClient<OpenAIConfig>),
    Anthropic { http: reqwest::Client, url: String },
}

/// Client for whichever provider the config names.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    backend: Backend,
}

impl LlmClient {
    /// Builds the provider backend once; requests reuse it.
    #[instrument(skip(config), fields(provider = %config.provider(), model = %config.model()))]
    pub fn new(config: LlmConfig) -> Self {
        let backend = match config.provider {
            LlmProvider::OpenAI => {
                let mut openai = OpenAIConfig::new().with_api_key(config.api_key.clone());
                if let Some(base) = config.api_base() {
                    debug!(api_base = base, "Using custom OpenAI-compatible endpoint");
                    openai = openai.with_api_base(base);
                }
                Backend::OpenAI(OpenAIClient::with_config(openai))
            }
            LlmProvider::Anthropic => Backend::Anthropic {
                http: reqwest::Client::new(),
                url: anthropic_url(config.api_base()),
            },
        };
        info!("Created LLM client");
        Self { config, backend }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends `request` and returns the reply text.
    ///
    /// # Errors
    ///
    /// [`LlmError`] when the request cannot be built or sent, the server
    /// answers with an error status, or the reply carries no text.
    #[instrument(skip(self, request), fields(provider = %self.config.provider, model = %self.config.model))]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let reply = match &self.backend {
            Backend::OpenAI(client) => self.complete_openai(client, request).await?,
            Backend::Anthropic { http, url } => {
                self.complete_anthropic(http, url, request).await?
            }
        };
        info!(reply_len = reply.len(), "Completion received");
        Ok(reply)
    }

    #[allow(deprecated)]
    async fn complete_openai(
        &self,
        client: &OpenAIClient<OpenAIConfig>,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let messages = openai_messages(request)?;
        let body = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(request.budget(&self.config))
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build request: {}", e)))?;

        debug!("Sending chat completion request");
        let response = client
            .chat()
            .create(body)
            .await
            .map_err(|e| LlmError::new(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::new("No content in OpenAI response".to_string()))
    }

    async fn complete_anthropic(
        &self,
        http: &reqwest::Client,
        url: &str,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: request.budget(&self.config),
            system: request.system(),
            messages: [AnthropicMessage {
                role: "user",
                content: request.user(),
            }],
        };

        debug!(url, "Sending messages request");
        let response = http
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::new(format!("Anthropic API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::new(format!(
                "Anthropic API error {}: {}",
                status, detail
            )));
        }

        let reply: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::new(format!("Failed to parse Anthropic response: {}", e)))?;
        reply.text()
    }
}

/// Messages endpoint under `api_base`, or under the public API.
fn anthropic_url(api_base: Option<&str>) -> String {
    let base = api_base.unwrap_or(ANTHROPIC_API_BASE);
    format!("{}/messages", base.trim_end_matches('/'))
}

fn openai_messages(
    request: &CompletionRequest,
) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    let system = ChatCompletionRequestSystemMessageArgs::default()
        .content(request.system())
        .build()
        .map_err(|e| LlmError::new(format!("Failed to build system message: {}", e)))?;
    let user = ChatCompletionRequestUserMessageArgs::default()
        .content(request.user())
        .build()
        .map_err(|e| LlmError::new(format!("Failed to build user message: {}", e)))?;
    Ok(vec![system.into(), user.into()])
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicResponse {
    /// Concatenated text blocks; tool or image blocks carry no text.
    fn text(self) -> Result<String, LlmError> {
        let text: String = self
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            Err(LlmError::new("No text content in Anthropic response".to_string()))
        } else {
            Ok(text)
        }
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
