//! Schema registry
//!
//! Static description of the three account-usage tables the model is allowed
//! to query. The rendered document is embedded verbatim in every prompt, so
//! its formatting is part of the model contract.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Declared column type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
}

impl ColumnType {
    /// SQLite storage class used when materialising the table locally
    pub fn sqlite_type(&self) -> &'static str {
        match self {
            ColumnType::String => "TEXT",
            ColumnType::Number => "REAL",
        }
    }
}

/// One queryable table with its columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub table: String,
    #[serde(serialize_with = "serialize_ordered_columns")]
    pub columns: Vec<(String, ColumnType)>,
}

fn serialize_ordered_columns<S>(
    columns: &[(String, ColumnType)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for (name, ty) in columns {
        map.serialize_entry(name, ty)?;
    }
    map.end()
}

impl TableSchema {
    pub fn new(table: &str, columns: &[(&str, ColumnType)]) -> Self {
        Self {
            table: table.to_string(),
            columns: columns
                .iter()
                .map(|(name, ty)| (name.to_string(), *ty))
                .collect(),
        }
    }
}

/// Read-only registry of queryable tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

impl SchemaRegistry {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// The fixed cost/usage schema (SNOWFLAKE.ACCOUNT_USAGE subset)
    pub fn cost_usage() -> Self {
        use ColumnType::{Number, String};

        let query_history = TableSchema::new(
            "query_history",
            &[
                ("QUERY_ID", String),
                ("QUERY_TEXT", String),
                ("DATABASE_NAME", String),
                ("SCHEMA_NAME", String),
                ("QUERY_TYPE", String),
                ("SESSION_ID", Number),
                ("USER_NAME", String),
                ("ROLE_NAME", String),
                ("WAREHOUSE_NAME", String),
                ("WAREHOUSE_SIZE", String),
                ("WAREHOUSE_TYPE", String),
                ("CLUSTER_NUMBER", Number),
                ("QUERY_TAG", String),
                ("EXECUTION_STATUS", String),
                ("ERROR_CODE", Number),
                ("ERROR_MESSAGE", String),
                ("START_TIME", String),
                ("END_TIME", String),
                ("TOTAL_ELAPSED_TIME", Number),
                ("BYTES_SCANNED", Number),
                ("ROWS_PRODUCED", Number),
                ("COMPILATION_TIME", Number),
                ("EXECUTION_TIME", Number),
                ("CREDITS_USED_CLOUD_SERVICES", Number),
            ],
        );

        let warehouse_metering_history = TableSchema::new(
            "warehouse_metering_history",
            &[
                ("START_TIME", String),
                ("END_TIME", String),
                ("WAREHOUSE_NAME", String),
                ("CREDITS_USED", Number),
                ("CREDITS_USED_COMPUTE", Number),
                ("CREDITS_USED_CLOUD_SERVICES", Number),
            ],
        );

        let query_attribution_history = TableSchema::new(
            "query_attribution_history",
            &[
                ("QUERY_ID", String),
                ("WAREHOUSE_NAME", String),
                ("USER_NAME", String),
                ("START_TIME", String),
                ("END_TIME", String),
                ("CREDITS_ATTRIBUTED_COMPUTE", Number),
            ],
        );

        Self::new(vec![
            query_history,
            warehouse_metering_history,
            query_attribution_history,
        ])
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Render the schema document: one pretty-printed JSON object per table,
    /// newline separated.
    pub fn describe(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                // Serializing a struct of strings and unit enums cannot fail
                serde_json::to_string_pretty(table).unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::cost_usage()
    }
}
