//! Noodle CLI
//!
//! `ask` answers one question, `repl` keeps a session with history,
//! `schema` prints the schema document, `init-db` creates a local warehouse.

use anyhow::Context;
use clap::Parser;

use noodle_analyst::cli::{run_cli, Cli, EXIT_FAILURE};
use noodle_analyst::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let guard = match init_logging(cli.verbose, cli.log_file.as_deref())
        .context("failed to initialise logging")
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let code = run_cli(&cli);
    // Flush the file layer before exiting
    drop(guard);
    std::process::exit(code);
}
