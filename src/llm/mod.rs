//! LLM integration: model gateway and prompt contracts
//!
//! - `adapters`: provider-agnostic completion interface (the model gateway)
//! - `contracts`: generation / explanation / repair prompt templates

pub mod adapters;
pub mod contracts;

// Re-export adapters
pub use adapters::{create_adapter, Adapter, LlmAdapter, LlmMessage, LlmRole, ModelError};

// Re-export contract functions
pub use contracts::{explanation_prompt, generation_prompt, repair_prompt, GenerationPrompt};
