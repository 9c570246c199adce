//! Pipeline outcome types

use serde::Serialize;

use crate::warehouse::QueryResult;

/// Successful run: the query that finally executed and its result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub final_query: String,
    pub result: QueryResult,
    /// Best-effort; absent when the explanation call failed
    pub explanation: Option<String>,
    /// Repair attempts it took to get an executable query
    pub repairs: usize,
}

/// Terminal result of one pipeline run, owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success(Answer),
    /// The model produced no usable SELECT for the question
    GenerationFailed,
    /// Execution kept failing until the repair budget ran out or a repair
    /// produced no usable SELECT
    ExecutionFailed { last_error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn answer(&self) -> Option<&Answer> {
        match self {
            Outcome::Success(answer) => Some(answer),
            _ => None,
        }
    }
}
