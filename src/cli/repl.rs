//! Interactive session
//!
//! Each line is a question unless it starts with "/":
//! - /history: answered questions, newest first
//! - /clear: forget the history
//! - /csv [file]: export the last result (default `snowflake_data.csv`)
//! - /quit, /q, /exit: leave

use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::dispatch::render_view;
use crate::cli::{OutputFormat, Result};
use crate::history::History;
use crate::llm::LlmAdapter;
use crate::packaging::package;
use crate::pipeline::{Outcome, QueryPipeline};
use crate::render::{write_csv_file, DEFAULT_CSV_FILE};
use crate::warehouse::{QueryResult, Warehouse};

const PROMPT: &str = "noodle> ";

const HELP: &str = "Ask a question about warehouse cost or usage, or use a command:
  /history       answered questions, newest first
  /clear         clear the history
  /csv [file]    export the last result as CSV
  /quit          leave";

/// REPL session state
pub struct Repl<A, W> {
    pipeline: QueryPipeline<A>,
    warehouse: W,
    history: History,
    last_result: Option<QueryResult>,
}

impl<A: LlmAdapter, W: Warehouse> Repl<A, W> {
    pub fn new(pipeline: QueryPipeline<A>, warehouse: W) -> Self {
        Self {
            pipeline,
            warehouse,
            history: History::new(),
            last_result: None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Read lines until EOF or a quit command
    pub fn run<R: BufRead, O: Write>(&mut self, input: R, out: &mut O) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            if !self.handle_line(line.trim(), out)? {
                return Ok(());
            }
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Handle one input line; `false` ends the session
    pub fn handle_line<O: Write>(&mut self, line: &str, out: &mut O) -> Result<bool> {
        if line.is_empty() {
            return Ok(true);
        }

        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.split_whitespace();
            match parts.next().unwrap_or_default() {
                "quit" | "q" | "exit" => return Ok(false),
                "history" => self.print_history(out)?,
                "clear" => {
                    self.history.clear();
                    writeln!(out, "History cleared")?;
                }
                "csv" => {
                    let file = parts.next().unwrap_or(DEFAULT_CSV_FILE);
                    self.export_csv(Path::new(file), out)?;
                }
                "help" => writeln!(out, "{}", HELP)?,
                other => writeln!(out, "Unknown command: /{} (try /help)", other)?,
            }
            return Ok(true);
        }

        self.ask(line, out)?;
        Ok(true)
    }

    fn ask<O: Write>(&mut self, question: &str, out: &mut O) -> Result<()> {
        let outcome = self.pipeline.run(question, &mut self.warehouse);
        let view = package(&outcome);
        write!(out, "{}", render_view(&view, OutputFormat::Table)?)?;

        if let Outcome::Success(answer) = outcome {
            self.history.record(question, &answer.final_query);
            self.last_result = Some(answer.result);
        }
        Ok(())
    }

    fn print_history<O: Write>(&self, out: &mut O) -> Result<()> {
        if self.history.is_empty() {
            writeln!(out, "No questions yet")?;
            return Ok(());
        }
        for entry in self.history.newest_first() {
            writeln!(
                out,
                "[{}] {}\n    {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.question,
                entry.final_query
            )?;
        }
        Ok(())
    }

    fn export_csv<O: Write>(&self, path: &Path, out: &mut O) -> Result<()> {
        match &self.last_result {
            Some(result) => {
                write_csv_file(path, result)?;
                writeln!(out, "Wrote {} rows to {}", result.row_count(), path.display())?;
            }
            None => writeln!(out, "No result to export yet")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::StubAdapter;
    use crate::schema::SchemaRegistry;
    use crate::warehouse::SqliteWarehouse;

    fn seeded_warehouse() -> SqliteWarehouse {
        let warehouse = SqliteWarehouse::open_in_memory().unwrap();
        warehouse
            .create_tables(&SchemaRegistry::cost_usage())
            .unwrap();
        warehouse
            .conn()
            .execute(
                "INSERT INTO warehouse_metering_history (WAREHOUSE_NAME, CREDITS_USED) VALUES ('ETL_WH', 4.0)",
                [],
            )
            .unwrap();
        warehouse
    }

    fn repl(sql: &str) -> Repl<StubAdapter, SqliteWarehouse> {
        let pipeline = QueryPipeline::new(
            StubAdapter::with_response(sql.to_string()),
            SchemaRegistry::cost_usage(),
        );
        Repl::new(pipeline, seeded_warehouse())
    }

    fn run_session(repl: &mut Repl<StubAdapter, SqliteWarehouse>, input: &str) -> String {
        let mut out = Vec::new();
        repl.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_question_then_history() {
        let mut repl = repl("SELECT WAREHOUSE_NAME, CREDITS_USED FROM warehouse_metering_history");
        let out = run_session(&mut repl, "which warehouse burns credits?\n/history\n/quit\n");

        assert!(out.contains("ETL_WH"));
        assert!(out.contains("which warehouse burns credits?\n    SELECT WAREHOUSE_NAME"));
        assert_eq!(repl.history().len(), 1);
    }

    #[test]
    fn test_failed_question_not_recorded() {
        let mut repl = repl("I cannot answer that");
        let out = run_session(&mut repl, "what?\n/history\n");

        assert!(out.contains("Unable to understand question. Please rephrase."));
        assert!(out.contains("No questions yet"));
        assert!(repl.history().is_empty());
    }

    #[test]
    fn test_clear_and_unknown_command() {
        let mut repl = repl("SELECT 1 AS ONE");
        let out = run_session(&mut repl, "q1\n/clear\n/bogus\n");
        assert!(out.contains("History cleared"));
        assert!(out.contains("Unknown command: /bogus"));
        assert!(repl.history().is_empty());
    }

    #[test]
    fn test_csv_export_of_last_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut repl = repl("SELECT WAREHOUSE_NAME, CREDITS_USED FROM warehouse_metering_history");

        let out = run_session(&mut repl, &format!("/csv {}\nq\n/csv {}\n", path.display(), path.display()));
        assert!(out.contains("No result to export yet"));
        assert!(out.contains("Wrote 1 rows"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "WAREHOUSE_NAME,CREDITS_USED\nETL_WH,4\n");
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut repl = repl("SELECT 1 AS ONE");
        run_session(&mut repl, "/quit\nnever asked\n");
        assert!(repl.history().is_empty());
    }
}
