//! The generation-oracle boundary.
//!
//! Everything the application knows about the external generative-AI
//! service is expressed here: a request shape, an error taxonomy, and one
//! async trait. The oracle is an opaque collaborator; there is exactly one
//! attempt per call and no retry/backoff at this layer.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a generation agent.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The request could not be executed at all (config, transport setup).
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote service answered with a failure.
    #[error("Agent process error (status: {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        /// Whether a later manual retry is likely to succeed. Informational
        /// only; this layer never retries.
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The service answered, but the payload did not match the expected
    /// shape.
    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),
}

/// A single request to the generation oracle.
///
/// Carries the free-text prompt plus the optional structured-output schema
/// and the external-search flag.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the oracle is asked to answer with JSON matching this
    /// schema.
    pub response_schema: Option<Value>,
    /// When set, the oracle may use its external search capability.
    pub enable_search: bool,
}

impl GenerationRequest {
    /// A plain free-text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            enable_search: false,
        }
    }

    /// Requests structured JSON output matching `schema`.
    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Enables the oracle's external search capability for this request.
    pub fn with_search(mut self) -> Self {
        self.enable_search = true;
        self
    }
}

/// An agent that can execute generation requests against an oracle backend.
#[async_trait]
pub trait GenerationAgent: Send + Sync {
    /// Executes one request and returns the oracle's raw text response.
    async fn execute(&self, request: GenerationRequest) -> Result<String, AgentError>;
}
