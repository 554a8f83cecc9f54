//! Error types for downstream gateways and tool dispatch.

use std::time::Duration;
use thiserror::Error;

/// A failure talking to the graph store or the language model.
///
/// These never cross the gateway boundary: [`crate::graph::GraphGateway`] and
/// [`crate::llm::LlmGateway`] log them and degrade to a soft-failure value.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend not configured")]
    NotConfigured,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("query failed ({code}): {message}")]
    Query { code: String, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl GatewayError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Query { code, .. } => code.starts_with("Neo.TransientError"),
            Self::Timeout(_) => true,
            Self::NotConfigured | Self::Config(_) | Self::Decode(_) => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// A `tools/call` that cannot be answered with tool content at all.
///
/// Missing or invalid arguments are *not* dispatch errors; they come back as
/// error-flagged tool content.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl DispatchError {
    pub fn code(&self) -> i64 {
        match self {
            Self::UnknownTool(_) => crate::protocol::INVALID_PARAMS,
        }
    }
}
