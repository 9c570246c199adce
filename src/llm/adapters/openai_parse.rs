//! OpenAI response parsing
//!
//! Public functions for building and parsing chat-completion JSON.

use serde_json::Value as JsonValue;

use crate::llm::adapters::{LlmMessage, ModelError};

/// Build the chat-completion request body
///
/// `{"model": ..., "messages": [{"role": ..., "content": ...}, ...]}`
pub fn build_chat_request(model: &str, messages: &[LlmMessage]) -> String {
    let messages: Vec<JsonValue> = messages
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content
            })
        })
        .collect();

    serde_json::json!({
        "model": model,
        "messages": messages
    })
    .to_string()
}

/// Parse OpenAI chat completion JSON response
///
/// Requires `choices[0].message.content` to be a string; returns it trimmed.
pub fn parse_chat_completion(response: &str) -> Result<String, ModelError> {
    let json: JsonValue = serde_json::from_str(response)?;

    let content = json["choices"]
        .get(0)
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            ModelError::InvalidResponse("Missing choices[0].message.content".to_string())
        })?;

    Ok(content.trim().to_string())
}
