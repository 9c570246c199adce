//! Prompt contracts
//!
//! Defines the fixed contract between the model and the pipeline.

mod prompts;

pub use prompts::{explanation_prompt, generation_prompt, repair_prompt, GenerationPrompt};
