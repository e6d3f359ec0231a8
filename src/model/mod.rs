//! # Generative Model Port
//!
//! The curator talks to a language model through the narrow [`ChatModel`]
//! trait: one system directive, one user message, raw text back. The text is
//! untrusted and only ever handed to the extraction and reconciliation stages.
//!
//! [`ollama::OllamaClient`] is the production implementation (feature
//! `ollama`). Tests plug in scripted doubles.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "ollama")]
pub mod ollama;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Errors raised by a model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The call did not finish within the caller's bound.
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure (connect, send, read).
    #[error("model request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status.
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered but the envelope could not be decoded.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// A single-turn chat request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Backend generation options, e.g. `num_ctx` or `temperature`.
    pub options: Map<String, Value>,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the request and return the model's raw reply text.
    async fn chat(&self, request: ChatRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_collects_options() {
        let req = ChatRequest::new("sys", "user")
            .with_option("num_ctx", 8192)
            .with_option("temperature", 0.4);
        assert_eq!(req.options["num_ctx"], Value::from(8192));
        assert_eq!(req.options.len(), 2);
    }
}
