//! Language-Model Gateway.
//!
//! [`LanguageModel`] is the backend seam; [`LlmGateway`] adds the
//! timeout/retry policy and turns every failure into a placeholder string.

pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::GatewayError;
use crate::retry::RetryPolicy;

/// Returned when no language model is configured.
pub const NOT_AVAILABLE: &str = "Language model not available";
/// Answer budget used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Single-turn text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError>;

    fn model_name(&self) -> &str;
}

/// Soft-failing front for an optional [`LanguageModel`].
#[derive(Clone)]
pub struct LlmGateway {
    model: Option<Arc<dyn LanguageModel>>,
    policy: RetryPolicy,
    max_tokens: u32,
}

impl LlmGateway {
    pub fn new(model: Arc<dyn LanguageModel>, policy: RetryPolicy) -> Self {
        Self {
            model: Some(model),
            policy,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            model: None,
            policy: RetryPolicy::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build from config. No API key means no model; nothing is probed.
    pub fn from_config(config: &LlmConfig) -> Self {
        if !config.is_configured() {
            tracing::info!("language model not configured (set OPENAI_API_KEY)");
            return Self::unconfigured();
        }

        match openai::OpenAiClient::new(config) {
            Ok(client) => {
                tracing::info!(model = %config.model, "language model configured");
                Self::new(Arc::new(client), RetryPolicy::for_llm(config))
                    .with_max_tokens(config.max_tokens)
            }
            Err(e) => {
                tracing::warn!(error = %e, "language model client unusable");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.model_name())
    }

    /// Token budget for synthesized answers.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Complete `prompt`. Never fails: an unconfigured or failing backend
    /// yields a placeholder sentence instead.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> String {
        match self.try_complete(prompt, max_tokens).await {
            Ok(text) => text,
            Err(GatewayError::NotConfigured) => NOT_AVAILABLE.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "language model call failed");
                format!("Language model error: {e}")
            }
        }
    }

    /// Like [`complete`](Self::complete) but keeps the error.
    pub async fn try_complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        let model = self.model.as_ref().ok_or(GatewayError::NotConfigured)?;
        self.policy
            .run("llm_complete", || model.complete(prompt, max_tokens))
            .await
    }
}
