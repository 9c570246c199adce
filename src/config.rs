//! Configuration
//!
//! TOML configuration for the model gateway and the warehouse client.
//!
//! Resolution priority for the config file:
//! 1. `--config <path>` flag (must exist)
//! 2. `$NOODLE_CONFIG` (must exist)
//! 3. `./noodle.toml` if present, built-in defaults otherwise
//!
//! Secret values may be written as `env:NAME` and are resolved from the
//! environment when the client is built.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::llm::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::transport::DEFAULT_TIMEOUT_SECS;

/// Default config file name in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "noodle.toml";

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "NOODLE_CONFIG";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing config value: {0}")]
    Missing(String),

    #[error("Environment variable {0} is not set")]
    Env(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
}

/// Model provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Stub,
}

/// `[llm]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Fixed completion for the stub provider
    #[serde(default)]
    pub stub_response: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key() -> String {
    "env:OPENROUTER_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: default_api_key(),
            timeout_secs: default_timeout(),
            stub_response: None,
        }
    }
}

/// `[warehouse]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WarehouseConfig {
    Sqlite(SqliteConfig),
    Snowflake(SnowflakeConfig),
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        WarehouseConfig::Sqlite(SqliteConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    #[serde(default = "default_sqlite_path")]
    pub path: PathBuf,
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("usage.db")
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

/// Snowflake SQL API settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnowflakeConfig {
    /// Account identifier, e.g. `xy12345.us-east-1`
    pub account: String,
    /// OAuth access token or key-pair JWT (usually `env:NAME`)
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Status polls before an asynchronous statement is abandoned
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_token_type() -> String {
    "OAUTH".to_string()
}

fn default_database() -> String {
    "SNOWFLAKE".to_string()
}

fn default_schema() -> String {
    "ACCOUNT_USAGE".to_string()
}

fn default_max_polls() -> u32 {
    60
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration following the resolution priority
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Pick the config file to load, `None` meaning built-in defaults
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    None
}

/// Resolve an `env:NAME` reference
///
/// Plain values are returned as-is. A reference to an unset variable is an
/// error rather than a silent literal.
pub fn resolve_env_var(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env:") {
        Some(name) => std::env::var(name).map_err(|_| ConfigError::Env(name.to_string())),
        None => Ok(value.to_string()),
    }
}
