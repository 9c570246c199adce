//! SQL handling for model output

pub mod extract;

pub use extract::{extract_sql, is_select, NotASelectError};
