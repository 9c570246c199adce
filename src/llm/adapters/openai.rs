//! OpenAI-compatible adapter
//!
//! Talks to any `/chat/completions` endpoint (OpenAI, OpenRouter, ...).

use crate::llm::adapters::openai_parse::{build_chat_request, parse_chat_completion};
use crate::llm::adapters::{build_messages, LlmAdapter, ModelError};
use crate::transport::{SyncTransport, Transport};

/// Default endpoint (OpenRouter, OpenAI-compatible)
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://openrouter.ai/api/v1)
    base_url: String,
    /// Model name
    model: String,
    /// API key
    api_key: String,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create new adapter over the real HTTP transport
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self::with_transport(base_url, model, api_key, Transport::default())
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            transport,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl LlmAdapter for OpenAiAdapter {
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError> {
        let body = build_chat_request(&self.model, &build_messages(system, user));

        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.post_json(&self.endpoint(), &headers, &body)?;
        parse_chat_completion(&response.body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
