//! Warehouse clients
//!
//! The pipeline only needs `execute(sql) -> rows + columns or native error
//! text`. Two implementations:
//! - `SqliteWarehouse`: local SQLite copy of the usage tables (rusqlite)
//! - `SnowflakeWarehouse`: Snowflake SQL API v2 over HTTP

pub mod snowflake;
pub mod sqlite;

use std::fmt;

use serde::Serialize;

use crate::config::{ConfigError, WarehouseConfig};

pub use snowflake::SnowflakeWarehouse;
pub use sqlite::SqliteWarehouse;

/// One result cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Tabular result of one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// Statement failure, carrying the warehouse's own error text verbatim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for ExecutionError {
    fn from(err: rusqlite::Error) -> Self {
        ExecutionError::new(err.to_string())
    }
}

/// Failure to open or configure a warehouse client
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ConfigError> for WarehouseError {
    fn from(err: ConfigError) -> Self {
        WarehouseError::Configuration(err.to_string())
    }
}

/// Warehouse client
///
/// `execute` takes `&mut self`: a session handle runs one statement at a
/// time and a pipeline run holds it exclusively.
pub trait Warehouse {
    fn execute(&mut self, sql: &str) -> Result<QueryResult, ExecutionError>;

    /// Short label for logs
    fn name(&self) -> &str;
}

impl<W: Warehouse + ?Sized> Warehouse for &mut W {
    fn execute(&mut self, sql: &str) -> Result<QueryResult, ExecutionError> {
        (**self).execute(sql)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<W: Warehouse + ?Sized> Warehouse for Box<W> {
    fn execute(&mut self, sql: &str) -> Result<QueryResult, ExecutionError> {
        (**self).execute(sql)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Open the warehouse named by the `[warehouse]` config section
///
/// SQLite files are opened read-only: generated SQL never gets write access.
pub fn open_warehouse(config: &WarehouseConfig) -> Result<Box<dyn Warehouse>, WarehouseError> {
    match config {
        WarehouseConfig::Sqlite(sqlite) => {
            if !sqlite.path.exists() {
                return Err(WarehouseError::Configuration(format!(
                    "SQLite warehouse '{}' does not exist (create it with `noodle init-db`)",
                    sqlite.path.display()
                )));
            }
            Ok(Box::new(SqliteWarehouse::open_read_only(&sqlite.path)?))
        }
        WarehouseConfig::Snowflake(snowflake) => Ok(Box::new(SnowflakeWarehouse::new(snowflake)?)),
    }
}
