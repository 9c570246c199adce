//! Noodle: natural-language cost and usage analyst for cloud data warehouses
//!
//! A question goes through one bounded pipeline: the model writes a SELECT
//! against a fixed schema, the warehouse runs it, failed statements are
//! sent back to the model for repair a bounded number of times, and the
//! final answer is packaged for presentation.

pub mod chart;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod logging;
pub mod packaging;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod sql;
pub mod transport;
pub mod warehouse;

// Re-export the pipeline surface
pub use pipeline::{Answer, Outcome, QueryPipeline, DEFAULT_REPAIR_BOUND};

// Re-export schema and SQL extraction
pub use schema::{ColumnType, SchemaRegistry, TableSchema};
pub use sql::{extract_sql, NotASelectError};

// Re-export warehouse clients
pub use warehouse::{ExecutionError, QueryResult, Value, Warehouse};

// Re-export presentation helpers
pub use chart::{suggest_chart, ChartKind, ChartSpec};
pub use history::{History, HistoryEntry};
pub use packaging::{package, AnswerStatus, AnswerView};
