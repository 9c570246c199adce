//! CLI argument parsing
//!
//! ```text
//! noodle [--config PATH] [--log-file PATH] [-v...] <command>
//!
//! COMMANDS:
//!   ask <question> [--format table|json|csv] [--output FILE]
//!   repl
//!   schema
//!   init-db <path>
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CONFIG_ENV_VAR;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "noodle",
    version,
    about = "Ask cost and usage questions of your data warehouse in plain English"
)]
pub struct Cli {
    /// Config file (defaults to ./noodle.toml when present)
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Answer one question and exit
    Ask {
        question: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the rendered answer here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interactive session with question history
    Repl,

    /// Print the schema document given to the model
    Schema,

    /// Create an empty SQLite warehouse with the usage tables
    InitDb { path: PathBuf },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
