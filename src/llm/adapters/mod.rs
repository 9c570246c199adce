//! LLM Adapters
//!
//! Provider-agnostic interface for chat-completion HTTP APIs. This is the
//! model gateway: one synchronous request per call, no streaming, no retries.

pub mod factory;
pub mod openai;
pub mod openai_parse;
pub mod stub;

use std::sync::Arc;

use crate::config::ConfigError;
use crate::transport::TransportError;

// Re-export common types
pub use factory::create_adapter;
pub use openai::OpenAiAdapter;
pub use stub::StubAdapter;

/// LLM message role
///
/// The gateway only ever sends system and user turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    /// System message (sets behavior/context)
    System,
    /// User message (human input)
    User,
}

impl LlmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::System => "system",
            LlmRole::User => "user",
        }
    }
}

/// Single LLM message (provider-agnostic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    /// Message role
    pub role: LlmRole,
    /// Message content
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: LlmRole::System,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: LlmRole::User,
            content: content.to_string(),
        }
    }
}

/// Build the ordered message list for one completion
pub fn build_messages(system: &str, user: Option<&str>) -> Vec<LlmMessage> {
    let mut messages = vec![LlmMessage::system(system)];
    if let Some(user) = user {
        messages.push(LlmMessage::user(user));
    }
    messages
}

/// Model gateway errors
///
/// Every way a completion can fail collapses into this type; the pipeline
/// does not distinguish between variants, they exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Network failure or non-2xx status
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body parsed but lacks the completion field
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response body is not JSON
    #[error("JSON error: {0}")]
    Json(String),

    /// Adapter could not be built from configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err.to_string())
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}

/// LLM adapter trait
///
/// All providers implement this trait. The pipeline calls adapters through
/// this uniform interface.
pub trait LlmAdapter: Send + Sync {
    /// Request a single completion for a system prompt and optional user turn
    ///
    /// Returns the completion text, trimmed.
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError>;

    /// Get provider name for logging
    fn provider_name(&self) -> &str;
}

impl<T: LlmAdapter + ?Sized> LlmAdapter for &T {
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError> {
        (**self).complete(system, user)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: LlmAdapter + ?Sized> LlmAdapter for Arc<T> {
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError> {
        (**self).complete(system, user)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Adapter enum, the concrete type for all providers built from configuration
#[derive(Debug)]
pub enum Adapter {
    OpenAi(OpenAiAdapter),
    Stub(StubAdapter),
}

impl LlmAdapter for Adapter {
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError> {
        match self {
            Adapter::OpenAi(a) => a.complete(system, user),
            Adapter::Stub(a) => a.complete(system, user),
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Adapter::OpenAi(a) => a.provider_name(),
            Adapter::Stub(a) => a.provider_name(),
        }
    }
}
