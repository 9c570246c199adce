//! Logging setup, powered by tracing-subscriber
//!
//! stderr gets a compact human layer; `--log-file` adds a JSON-lines layer
//! written through a non-blocking appender.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "NOODLE_LOG";

/// Base level for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Directive string used when `NOODLE_LOG` is unset
pub fn default_directives(verbosity: u8) -> String {
    let level = level_for_verbosity(verbosity);
    // HTTP internals stay quiet unless asked for through NOODLE_LOG
    format!("{},ureq=warn,rustls=warn", level)
}

fn build_env_filter(verbosity: u8) -> anyhow::Result<EnvFilter> {
    let directives = match std::env::var(LOG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default_directives(verbosity),
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", directives, e))
}

/// Install the global subscriber
///
/// The returned guard flushes the file layer on drop; hold it for the
/// lifetime of the process.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(build_env_filter(verbosity)?);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_current_span(true)
                .with_filter(build_env_filter(verbosity)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logging already initialised: {}", e))?;

    tracing::debug!(verbosity, file = ?log_file, "logging initialised");
    Ok(guard)
}
