//! Chat-completion client for the hosted language model

use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_parse_or, env_required};
use observability::UpstreamTimer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::{RecommenderError, RecommenderResult};
use crate::models::ChatMessage;

/// Sends a rendered prompt to the model and returns its raw text answer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> RecommenderResult<String>;
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub endpoint_url: String,
    pub token: String,
    /// Sent as `model` when the endpoint serves more than one
    pub model: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("token", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(endpoint_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            token: token.into(),
            model: None,
            max_tokens: 128,
            timeout: Duration::from_secs(300),
        }
    }
}

impl FromEnv for GatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(
            env_required("LLM_RECOMMENDER_ENDPOINT_URL")?,
            env_required("LLM_RECOMMENDER_PAT")?,
        );
        config.model = env_optional("LLM_RECOMMENDER_MODEL");
        config.max_tokens = env_parse_or("LLM_RECOMMENDER_MAX_TOKENS", 128)?;
        config.timeout =
            Duration::from_secs(env_parse_or("LLM_RECOMMENDER_HTTP_TIMEOUT_SECS", 300)?);
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// [`LlmGateway`] over a chat-completions style serving endpoint
pub struct ChatCompletionGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl ChatCompletionGateway {
    pub fn new(config: GatewayConfig) -> RecommenderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecommenderError::UpstreamUnavailable(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn send(&self, prompt: &str) -> RecommenderResult<String> {
        let request = ChatRequest {
            model: self.config.model.as_deref(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(&self.config.endpoint_url)
            .basic_auth("token", Some(&self.config.token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Chat completion request failed");
            return Err(RecommenderError::UpstreamUnavailable(format!(
                "model endpoint returned {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                RecommenderError::MalformedResponse("model response has no choices".to_string())
            })
    }
}

#[async_trait]
impl LlmGateway for ChatCompletionGateway {
    #[instrument(skip_all, fields(max_tokens = self.config.max_tokens))]
    async fn complete(&self, prompt: &str) -> RecommenderResult<String> {
        let timer = UpstreamTimer::start("llm");
        match self.send(prompt).await {
            Ok(content) => {
                let secs = timer.success();
                debug!(duration_secs = secs, chars = content.len(), "Model answered");
                Ok(content)
            }
            Err(e) => {
                timer.failure();
                Err(e)
            }
        }
    }
}
