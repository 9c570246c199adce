//! SQLite warehouse
//!
//! Local stand-in for the account-usage views. `create_tables` materialises
//! the schema registry so usage exports can be loaded and queried offline.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::schema::SchemaRegistry;
use crate::warehouse::{ExecutionError, QueryResult, Value, Warehouse};

/// SQLite-backed warehouse handle
pub struct SqliteWarehouse {
    conn: Connection,
    label: String,
}

impl std::fmt::Debug for SqliteWarehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteWarehouse")
            .field("label", &self.label)
            .finish()
    }
}

impl SqliteWarehouse {
    /// Open (or create) a database file read-write
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            conn: Connection::open(path)?,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Open an existing database file read-only
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn,
            label: format!("sqlite:{} (read-only)", path.display()),
        })
    }

    /// In-memory database (tests, demos)
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            label: "sqlite::memory:".to_string(),
        })
    }

    /// Exposed for loading data in tests and `init-db`
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create every registry table that does not exist yet
    pub fn create_tables(&self, registry: &SchemaRegistry) -> rusqlite::Result<()> {
        for table in registry.tables() {
            let columns = table
                .columns
                .iter()
                .map(|(name, ty)| format!("    {} {}", name, ty.sqlite_type()))
                .collect::<Vec<_>>()
                .join(",\n");
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
                table.table, columns
            );
            tracing::debug!(table = %table.table, "creating table");
            self.conn.execute(&ddl, [])?;
        }
        Ok(())
    }
}

fn convert(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Text(format!("<{} bytes>", bytes.len())),
    }
}

impl Warehouse for SqliteWarehouse {
    fn execute(&mut self, sql: &str) -> Result<QueryResult, ExecutionError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(convert(row.get_ref(index)?));
            }
            rows.push(values);
        }

        Ok(QueryResult { columns, rows })
    }

    fn name(&self) -> &str {
        &self.label
    }
}
