//! Pipeline state machine types
//!
//! ```text
//! Generating ──ok──▶ Executing ──ok──▶ Explaining ──▶ Done(Success)
//!     │                 │  ▲
//!     │ fail            │  │ ok (attempt + 1)
//!     ▼                 ▼  │
//! Done(GenerationFailed)  Repairing ──fail / bound reached──▶ Done(ExecutionFailed)
//! ```

use crate::pipeline::outcome::Outcome;
use crate::warehouse::QueryResult;

/// A not-yet-executed query that passed the SELECT gate
///
/// Never mutated; a repair produces a new candidate with the next index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub text: String,
    /// 0 for the generated query, n for the n-th repair
    pub attempt_index: usize,
}

impl CandidateQuery {
    pub fn generated(text: String) -> Self {
        Self {
            text,
            attempt_index: 0,
        }
    }

    pub fn repaired(previous: &CandidateQuery, text: String) -> Self {
        Self {
            text,
            attempt_index: previous.attempt_index + 1,
        }
    }
}

/// Pipeline state
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Generating,
    Executing(CandidateQuery),
    Repairing {
        failed: CandidateQuery,
        error: String,
    },
    Explaining {
        query: CandidateQuery,
        result: QueryResult,
    },
    Done(Outcome),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Generating => "generating",
            PipelineState::Executing(_) => "executing",
            PipelineState::Repairing { .. } => "repairing",
            PipelineState::Explaining { .. } => "explaining",
            PipelineState::Done(_) => "done",
        }
    }
}
