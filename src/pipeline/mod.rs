//! Query pipeline
//!
//! natural language → SQL → execution → bounded self-correction → explanation
//!
//! The pipeline is stateless across runs: it owns the model adapter and the
//! schema, borrows the warehouse for the duration of one run, and returns an
//! [`Outcome`] the caller owns. Lower-level failures never escape `run`.

mod outcome;
mod state;

use crate::llm::adapters::{LlmAdapter, ModelError};
use crate::llm::contracts::{explanation_prompt, generation_prompt, repair_prompt};
use crate::schema::SchemaRegistry;
use crate::sql::{extract_sql, NotASelectError};
use crate::warehouse::Warehouse;

pub use outcome::{Answer, Outcome};
pub use state::{CandidateQuery, PipelineState};

/// Model-assisted repairs allowed per question (executions = bound + 1)
pub const DEFAULT_REPAIR_BOUND: usize = 2;

/// Failure of a generate or repair step
///
/// The pipeline treats both variants the same way; the split is for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    NotASelect(#[from] NotASelectError),
}

/// NL-to-SQL pipeline over one model adapter and one schema
#[derive(Debug)]
pub struct QueryPipeline<A> {
    adapter: A,
    schema: SchemaRegistry,
    schema_doc: String,
    repair_bound: usize,
}

impl<A: LlmAdapter> QueryPipeline<A> {
    pub fn new(adapter: A, schema: SchemaRegistry) -> Self {
        let schema_doc = schema.describe();
        Self {
            adapter,
            schema,
            schema_doc,
            repair_bound: DEFAULT_REPAIR_BOUND,
        }
    }

    pub fn with_repair_bound(mut self, repair_bound: usize) -> Self {
        self.repair_bound = repair_bound;
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn repair_bound(&self) -> usize {
        self.repair_bound
    }

    /// Answer one question against `warehouse`
    pub fn run<W: Warehouse + ?Sized>(&self, question: &str, warehouse: &mut W) -> Outcome {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "pipeline",
            %run_id,
            provider = self.adapter.provider_name(),
            warehouse = warehouse.name()
        );
        let _enter = span.enter();

        let mut state = PipelineState::Generating;
        loop {
            if let PipelineState::Done(outcome) = state {
                tracing::info!(success = outcome.is_success(), "pipeline finished");
                return outcome;
            }
            tracing::debug!(state = state.name(), "pipeline step");
            state = self.step(state, question, warehouse);
        }
    }

    /// Advance the state machine by one transition
    ///
    /// `Done` is returned unchanged.
    pub fn step<W: Warehouse + ?Sized>(
        &self,
        state: PipelineState,
        question: &str,
        warehouse: &mut W,
    ) -> PipelineState {
        match state {
            PipelineState::Generating => match self.generate(question) {
                Ok(text) => PipelineState::Executing(CandidateQuery::generated(text)),
                Err(e) => {
                    tracing::warn!(error = %e, "generation failed");
                    PipelineState::Done(Outcome::GenerationFailed)
                }
            },

            PipelineState::Executing(candidate) => {
                tracing::info!(attempt = candidate.attempt_index, sql = %candidate.text, "executing");
                match warehouse.execute(&candidate.text) {
                    Ok(result) => PipelineState::Explaining {
                        query: candidate,
                        result,
                    },
                    Err(e) => {
                        tracing::warn!(attempt = candidate.attempt_index, error = %e, "execution failed");
                        if candidate.attempt_index < self.repair_bound {
                            PipelineState::Repairing {
                                failed: candidate,
                                error: e.message,
                            }
                        } else {
                            PipelineState::Done(Outcome::ExecutionFailed {
                                last_error: e.message,
                            })
                        }
                    }
                }
            }

            PipelineState::Repairing { failed, error } => {
                match self.repair(&failed.text, &error) {
                    Ok(text) => PipelineState::Executing(CandidateQuery::repaired(&failed, text)),
                    Err(e) => {
                        tracing::warn!(attempt = failed.attempt_index, error = %e, "repair failed");
                        PipelineState::Done(Outcome::ExecutionFailed { last_error: error })
                    }
                }
            }

            PipelineState::Explaining { query, result } => {
                let explanation = match self.explain(&query.text) {
                    Ok(text) if !text.is_empty() => Some(text),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "explanation failed, continuing without it");
                        None
                    }
                };
                PipelineState::Done(Outcome::Success(Answer {
                    final_query: query.text,
                    result,
                    explanation,
                    repairs: query.attempt_index,
                }))
            }

            done @ PipelineState::Done(_) => done,
        }
    }

    fn generate(&self, question: &str) -> Result<String, StepError> {
        if question.trim().is_empty() {
            return Err(StepError::NotASelect(NotASelectError {
                preview: String::new(),
            }));
        }
        let prompt = generation_prompt(&self.schema_doc);
        let raw = self.adapter.complete(&prompt.system, Some(question))?;
        Ok(extract_sql(&raw)?)
    }

    fn repair(&self, query: &str, error: &str) -> Result<String, StepError> {
        let prompt = repair_prompt(query, error, &self.schema_doc);
        let raw = self.adapter.complete(&prompt, None)?;
        Ok(extract_sql(&raw)?)
    }

    fn explain(&self, query: &str) -> Result<String, ModelError> {
        let prompt = explanation_prompt(query, &self.schema_doc);
        self.adapter.complete(&prompt, None)
    }
}
