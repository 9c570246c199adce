//! Result packaging
//!
//! Maps a pipeline [`Outcome`] to the record the presentation layer shows.
//! Raw error text stays out of the view; it only ever goes to the logs.

use serde::Serialize;

use crate::chart::{suggest_chart, ChartSpec};
use crate::pipeline::Outcome;
use crate::warehouse::Value;

pub const GENERATION_FAILED_MESSAGE: &str = "Unable to understand question. Please rephrase.";
pub const EXECUTION_FAILED_MESSAGE: &str = "Unable to process question. Please rephrase.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Success,
    GenerationFailed,
    ExecutionFailed,
}

/// Presentation-facing record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerView {
    pub status: AnswerStatus,
    pub query: Option<String>,
    pub columns: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<Value>>>,
    pub explanation: Option<String>,
    pub chart: Option<ChartSpec>,
    /// User-facing message on failure
    pub message: Option<String>,
}

impl AnswerView {
    pub fn is_success(&self) -> bool {
        self.status == AnswerStatus::Success
    }

    fn failure(status: AnswerStatus, message: &str) -> Self {
        Self {
            status,
            query: None,
            columns: None,
            rows: None,
            explanation: None,
            chart: None,
            message: Some(message.to_string()),
        }
    }
}

/// Package an outcome for presentation (pure)
pub fn package(outcome: &Outcome) -> AnswerView {
    match outcome {
        Outcome::Success(answer) => AnswerView {
            status: AnswerStatus::Success,
            query: Some(answer.final_query.clone()),
            columns: Some(answer.result.columns.clone()),
            rows: Some(answer.result.rows.clone()),
            explanation: answer.explanation.clone(),
            chart: suggest_chart(&answer.result),
            message: None,
        },
        Outcome::GenerationFailed => {
            AnswerView::failure(AnswerStatus::GenerationFailed, GENERATION_FAILED_MESSAGE)
        }
        Outcome::ExecutionFailed { .. } => {
            AnswerView::failure(AnswerStatus::ExecutionFailed, EXECUTION_FAILED_MESSAGE)
        }
    }
}
