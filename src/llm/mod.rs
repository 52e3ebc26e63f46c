//! Generative provider abstraction layer
//!
//! The core depends on exactly two capabilities of the external generative
//! service: schema-constrained structured extraction and a stateful
//! conversational step. The `GenerativeProvider` trait captures both so the
//! engine can run against the real Gemini backend or a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod gemini;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur while talking to a generative provider
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new model message
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
///
/// `Model` is the assistant role; the name follows the wire format of the
/// Gemini conversational API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,

    /// Model (assistant) message
    Model,

    /// System instruction
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Model => write!(f, "model"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Capability interface over the external generative service
///
/// Implementations must be cheap to share behind an `Arc` since the session
/// layer holds one for its whole lifetime.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the name of the provider (e.g. "gemini")
    fn name(&self) -> &str;

    /// One-shot structured extraction: send a prompt plus a JSON response
    /// schema, get back a JSON document the service claims matches it.
    ///
    /// The caller is responsible for validating the returned value against
    /// its own types; the provider only guarantees syntactically valid JSON.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// One conversational step: send the full prior history plus the newest
    /// user turn (already appended to `history`), get back the reply text.
    async fn converse(&self, history: &[Message]) -> Result<String>;

    /// Check if the provider is currently usable.
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}
