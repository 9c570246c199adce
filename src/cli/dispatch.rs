//! CLI command dispatch
//!
//! Dispatches to the command handlers:
//! - ask: one pipeline run, rendered as table / JSON / CSV
//! - repl: interactive session
//! - schema: print the schema document
//! - init-db: create a local SQLite warehouse

use std::io::Write;
use std::path::Path;

use crate::cli::repl::Repl;
use crate::cli::{Cli, Command, OutputFormat, Result, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::AppConfig;
use crate::llm::{create_adapter, Adapter, LlmAdapter};
use crate::packaging::{package, AnswerView};
use crate::pipeline::QueryPipeline;
use crate::render::{render_chart, render_table, to_csv_string};
use crate::schema::SchemaRegistry;
use crate::warehouse::{open_warehouse, QueryResult, SqliteWarehouse, Warehouse};

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run a parsed command line against stdout and return the exit code
///
/// Called from main() after argument parsing and logging setup.
pub fn run_cli(cli: &Cli) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_command(cli, &mut out) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Run a command, writing user-facing output to `out`
pub fn run_command<O: Write>(cli: &Cli, out: &mut O) -> Result<ExitCode> {
    match &cli.command {
        Command::Schema => {
            writeln!(out, "{}", SchemaRegistry::cost_usage().describe())?;
            Ok(EXIT_SUCCESS)
        }
        Command::InitDb { path } => init_db(path, out),
        Command::Ask {
            question,
            format,
            output,
        } => {
            let (pipeline, mut warehouse) = connect(cli)?;
            let outcome = pipeline.run(question, warehouse.as_mut());
            let view = package(&outcome);
            let rendered = render_view(&view, *format)?;
            match output {
                Some(path) => {
                    std::fs::write(path, rendered)?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => write!(out, "{}", rendered)?,
            }
            Ok(if view.is_success() {
                EXIT_SUCCESS
            } else {
                EXIT_FAILURE
            })
        }
        Command::Repl => {
            let (pipeline, warehouse) = connect(cli)?;
            let stdin = std::io::stdin();
            Repl::new(pipeline, warehouse).run(stdin.lock(), out)?;
            Ok(EXIT_SUCCESS)
        }
    }
}

fn connect(cli: &Cli) -> Result<(QueryPipeline<Adapter>, Box<dyn Warehouse>)> {
    let config = AppConfig::resolve(cli.config.as_deref())?;
    let adapter = create_adapter(&config.llm)?;
    let warehouse = open_warehouse(&config.warehouse)?;
    tracing::info!(
        provider = adapter.provider_name(),
        warehouse = warehouse.name(),
        "session ready"
    );
    Ok((
        QueryPipeline::new(adapter, SchemaRegistry::cost_usage()),
        warehouse,
    ))
}

fn init_db<O: Write>(path: &Path, out: &mut O) -> Result<ExitCode> {
    let registry = SchemaRegistry::cost_usage();
    let warehouse = SqliteWarehouse::open(path)?;
    warehouse.create_tables(&registry)?;
    writeln!(
        out,
        "Initialised {} with {} tables",
        path.display(),
        registry.tables().len()
    )?;
    Ok(EXIT_SUCCESS)
}

fn view_result(view: &AnswerView) -> Option<QueryResult> {
    Some(QueryResult {
        columns: view.columns.clone()?,
        rows: view.rows.clone()?,
    })
}

/// Render a packaged answer in the requested format
///
/// Failures render as their user-facing message in table and CSV modes.
pub fn render_view(view: &AnswerView, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let mut json = serde_json::to_string_pretty(view)?;
        json.push('\n');
        return Ok(json);
    }

    let result = match view_result(view) {
        Some(result) if view.is_success() => result,
        _ => {
            let message = view.message.as_deref().unwrap_or_default();
            return Ok(format!("{}\n", message));
        }
    };

    if format == OutputFormat::Csv {
        return Ok(to_csv_string(&result)?);
    }

    let mut text = String::new();
    if let Some(query) = &view.query {
        text.push_str(&format!("SQL:\n{}\n\n", query));
    }
    text.push_str(&render_table(&result, None));
    text.push('\n');
    if let Some(explanation) = &view.explanation {
        text.push_str(&format!("\n{}\n", explanation));
    }
    if let Some(chart) = view.chart.as_ref().and_then(|spec| render_chart(spec, &result)) {
        text.push_str(&format!("\n{}\n", chart));
    }
    Ok(text)
}
