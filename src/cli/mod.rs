//! CLI module
//!
//! Provides:
//! - Argument parsing (`ask`, `repl`, `schema`, `init-db`)
//! - Command dispatch and answer rendering
//! - The interactive REPL with question history

pub mod args;
pub mod dispatch;
pub mod repl;

// Re-exports
pub use args::{Cli, Command, OutputFormat};
pub use dispatch::{render_view, run_cli, run_command, ExitCode};
pub use repl::Repl;

use crate::config::ConfigError;
use crate::llm::ModelError;
use crate::warehouse::WarehouseError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model setup error: {0}")]
    Model(#[from] ModelError),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Config(_) | Error::Model(_) | Error::Warehouse(_) | Error::Database(_) => {
                EXIT_CONFIG_ERROR
            }
            _ => EXIT_FAILURE,
        }
    }
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
