//! Snowflake warehouse over the SQL API v2
//!
//! `POST /api/v2/statements` submits a statement. 200 carries the first
//! result partition, 202 means still running (poll the statement handle),
//! 4xx/5xx carry `{"message": ...}` which becomes the execution error text.

use std::time::Duration;

use serde::Deserialize;

use crate::config::{resolve_env_var, ConfigError, SnowflakeConfig};
use crate::transport::{HttpResponse, SyncTransport, Transport, TransportError};
use crate::warehouse::{ExecutionError, QueryResult, Value, Warehouse, WarehouseError};

/// Column metadata from `resultSetMetaData.rowType`
#[derive(Debug, Clone, Deserialize)]
pub struct RowType {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub scale: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<RowType>,
    #[serde(default)]
    partition_info: Vec<serde_json::Value>,
}

/// Statement response body (complete, in progress, or partition)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    statement_handle: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

/// Snowflake SQL API client
#[derive(Debug)]
pub struct SnowflakeWarehouse {
    base_url: String,
    token: String,
    config: SnowflakeConfig,
    transport: Transport,
    label: String,
}

impl SnowflakeWarehouse {
    /// Build a client for `https://<account>.snowflakecomputing.com`
    pub fn new(config: &SnowflakeConfig) -> Result<Self, WarehouseError> {
        let base_url = format!("https://{}.snowflakecomputing.com", config.account);
        Self::with_transport(config, &base_url, Transport::real(config.timeout_secs))
    }

    /// Build a client with an explicit endpoint and transport (for testing)
    pub fn with_transport(
        config: &SnowflakeConfig,
        base_url: &str,
        transport: Transport,
    ) -> Result<Self, WarehouseError> {
        if config.account.trim().is_empty() {
            return Err(ConfigError::Missing("warehouse.account".to_string()).into());
        }
        let token = resolve_env_var(&config.token)?;
        if token.trim().is_empty() {
            return Err(ConfigError::Missing("warehouse.token".to_string()).into());
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            label: format!("snowflake:{}", config.account),
            config: config.clone(),
            transport,
        })
    }

    fn statement_body(&self, sql: &str) -> String {
        let mut body = serde_json::json!({
            "statement": sql,
            "timeout": self.config.timeout_secs,
            "database": self.config.database,
            "schema": self.config.schema,
        });
        if let Some(ref warehouse) = self.config.warehouse {
            body["warehouse"] = serde_json::json!(warehouse);
        }
        if let Some(ref role) = self.config.role {
            body["role"] = serde_json::json!(role);
        }
        body.to_string()
    }

    fn submit(&self, sql: &str) -> Result<HttpResponse, ExecutionError> {
        let url = format!(
            "{}/api/v2/statements?requestId={}",
            self.base_url,
            uuid::Uuid::new_v4()
        );
        let auth = format!("Bearer {}", self.token);
        let headers = [
            ("Authorization", auth.as_str()),
            ("X-Snowflake-Authorization-Token-Type", self.config.token_type.as_str()),
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
            ("User-Agent", concat!("noodle-analyst/", env!("CARGO_PKG_VERSION"))),
        ];
        self.transport
            .post_json(&url, &headers, &self.statement_body(sql))
            .map_err(statement_error)
    }

    fn fetch(&self, handle: &str, partition: Option<usize>) -> Result<HttpResponse, ExecutionError> {
        let mut url = format!("{}/api/v2/statements/{}", self.base_url, handle);
        if let Some(partition) = partition {
            url.push_str(&format!("?partition={}", partition));
        }
        let auth = format!("Bearer {}", self.token);
        let headers = [
            ("Authorization", auth.as_str()),
            ("X-Snowflake-Authorization-Token-Type", self.config.token_type.as_str()),
            ("Accept", "application/json"),
        ];
        self.transport
            .get_json(&url, &headers)
            .map_err(statement_error)
    }

    /// Poll an asynchronous statement until it completes
    fn wait_for_completion(&self, mut response: HttpResponse) -> Result<StatementResponse, ExecutionError> {
        let mut polls = 0;
        loop {
            let parsed = parse_statement(&response.body)?;
            if response.status != 202 {
                return Ok(parsed);
            }

            let handle = parsed.statement_handle.ok_or_else(|| {
                ExecutionError::new("Snowflake accepted the statement without a statement handle")
            })?;
            if polls >= self.config.max_polls {
                return Err(ExecutionError::new(format!(
                    "Statement {} still running after {} status checks",
                    handle, polls
                )));
            }
            polls += 1;
            tracing::debug!(%handle, polls, "statement still running");
            std::thread::sleep(Duration::from_millis(self.config.poll_interval_ms));
            response = self.fetch(&handle, None)?;
        }
    }
}

impl Warehouse for SnowflakeWarehouse {
    fn execute(&mut self, sql: &str) -> Result<QueryResult, ExecutionError> {
        let first = self.submit(sql)?;
        let complete = self.wait_for_completion(first)?;

        let meta = complete.result_set_meta_data.ok_or_else(|| {
            ExecutionError::new(
                complete
                    .message
                    .clone()
                    .unwrap_or_else(|| "Snowflake response has no result metadata".to_string()),
            )
        })?;

        let mut raw_rows = complete.data;
        if meta.partition_info.len() > 1 {
            let handle = complete.statement_handle.ok_or_else(|| {
                ExecutionError::new("Partitioned result without a statement handle")
            })?;
            for partition in 1..meta.partition_info.len() {
                let response = self.fetch(&handle, Some(partition))?;
                raw_rows.extend(parse_statement(&response.body)?.data);
            }
        }

        let columns = meta.row_type.iter().map(|c| c.name.clone()).collect();
        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(meta.row_type.iter())
                    .map(|(cell, column)| convert_cell(cell, column))
                    .collect()
            })
            .collect();

        Ok(QueryResult { columns, rows })
    }

    fn name(&self) -> &str {
        &self.label
    }
}

fn parse_statement(body: &str) -> Result<StatementResponse, ExecutionError> {
    serde_json::from_str(body)
        .map_err(|e| ExecutionError::new(format!("Malformed Snowflake response: {}", e)))
}

/// Map a transport failure to the error text forwarded to the repair prompt
///
/// Snowflake error bodies carry the compiler message in `message`; that text
/// is used verbatim. Anything else falls back to the transport error.
fn statement_error(err: TransportError) -> ExecutionError {
    if let TransportError::Http { ref body, .. } = err {
        if let Ok(parsed) = serde_json::from_str::<StatementResponse>(body) {
            if let Some(message) = parsed.message {
                return ExecutionError::new(message);
            }
        }
    }
    ExecutionError::new(err.to_string())
}

/// Convert one cell string according to its column type
///
/// Cells arrive as strings (or null); unparseable numbers stay text.
pub fn convert_cell(cell: Option<String>, column: &RowType) -> Value {
    let Some(text) = cell else {
        return Value::Null;
    };

    match column.kind.to_ascii_lowercase().as_str() {
        "fixed" if column.scale.unwrap_or(0) == 0 => text
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or(Value::Text(text)),
        "fixed" | "real" => text
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(Value::Text(text)),
        "boolean" => match text.as_str() {
            "true" | "TRUE" | "1" => Value::Bool(true),
            "false" | "FALSE" | "0" => Value::Bool(false),
            _ => Value::Text(text),
        },
        _ => Value::Text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;
    use std::sync::Arc;

    fn config() -> SnowflakeConfig {
        SnowflakeConfig {
            account: "xy12345.us-east-1".to_string(),
            token: "tok".to_string(),
            token_type: "OAUTH".to_string(),
            database: "SNOWFLAKE".to_string(),
            schema: "ACCOUNT_USAGE".to_string(),
            warehouse: Some("COMPUTE_WH".to_string()),
            role: None,
            timeout_secs: 30,
            max_polls: 2,
            poll_interval_ms: 0,
        }
    }

    fn client(responses: Vec<Result<HttpResponse, TransportError>>) -> (SnowflakeWarehouse, Arc<FakeTransport>) {
        let (transport, fake) = Transport::fake(FakeTransport::with_responses(responses));
        let warehouse =
            SnowflakeWarehouse::with_transport(&config(), "https://sf.test", transport).unwrap();
        (warehouse, fake)
    }

    const COMPLETE: &str = r#"{
        "statementHandle": "h-1",
        "resultSetMetaData": {
            "numRows": 2,
            "rowType": [
                {"name": "WAREHOUSE_NAME", "type": "text"},
                {"name": "QUERIES", "type": "fixed", "scale": 0},
                {"name": "CREDITS", "type": "fixed", "scale": 3}
            ],
            "partitionInfo": [{"rowCount": 2}]
        },
        "data": [["COMPUTE_WH", "12", "3.500"], ["ETL_WH", null, "1.250"]]
    }"#;

    #[test]
    fn test_execute_complete_response() {
        let (mut warehouse, fake) = client(vec![Ok(HttpResponse::ok(COMPLETE))]);
        let result = warehouse.execute("SELECT 1").unwrap();

        assert_eq!(result.columns, vec!["WAREHOUSE_NAME", "QUERIES", "CREDITS"]);
        assert_eq!(
            result.rows,
            vec![
                vec![
                    Value::Text("COMPUTE_WH".to_string()),
                    Value::Integer(12),
                    Value::Float(3.5)
                ],
                vec![Value::Text("ETL_WH".to_string()), Value::Null, Value::Float(1.25)],
            ]
        );

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.starts_with("https://sf.test/api/v2/statements?requestId="));
        assert_eq!(requests[0].header("Authorization"), Some("Bearer tok"));
        assert_eq!(
            requests[0].header("X-Snowflake-Authorization-Token-Type"),
            Some("OAUTH")
        );
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["statement"], "SELECT 1");
        assert_eq!(body["database"], "SNOWFLAKE");
        assert_eq!(body["schema"], "ACCOUNT_USAGE");
        assert_eq!(body["warehouse"], "COMPUTE_WH");
        assert!(body.get("role").is_none());
    }

    #[test]
    fn test_execute_polls_async_statement() {
        let running = HttpResponse {
            status: 202,
            body: r#"{"code":"333334","message":"Asynchronous execution in progress.","statementHandle":"h-1"}"#.to_string(),
        };
        let (mut warehouse, fake) = client(vec![Ok(running.clone()), Ok(running), Ok(HttpResponse::ok(COMPLETE))]);

        let result = warehouse.execute("SELECT 1").unwrap();
        assert_eq!(result.row_count(), 2);

        let requests = fake.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].url, "https://sf.test/api/v2/statements/h-1");
    }

    #[test]
    fn test_execute_gives_up_after_max_polls() {
        let running = HttpResponse {
            status: 202,
            body: r#"{"statementHandle":"h-9"}"#.to_string(),
        };
        let (mut warehouse, _) = client(vec![Ok(running.clone()), Ok(running.clone()), Ok(running)]);
        let err = warehouse.execute("SELECT 1").unwrap_err();
        assert!(err.message.contains("still running"));
    }

    #[test]
    fn test_execute_fetches_extra_partitions() {
        let first = r#"{
            "statementHandle": "h-2",
            "resultSetMetaData": {
                "rowType": [{"name": "N", "type": "fixed", "scale": 0}],
                "partitionInfo": [{"rowCount": 1}, {"rowCount": 1}]
            },
            "data": [["1"]]
        }"#;
        let second = r#"{"data": [["2"]]}"#;
        let (mut warehouse, fake) =
            client(vec![Ok(HttpResponse::ok(first)), Ok(HttpResponse::ok(second))]);

        let result = warehouse.execute("SELECT N").unwrap();
        assert_eq!(
            result.rows,
            vec![vec![Value::Integer(1)], vec![Value::Integer(2)]]
        );
        assert_eq!(
            fake.requests()[1].url,
            "https://sf.test/api/v2/statements/h-2?partition=1"
        );
    }

    #[test]
    fn test_compilation_error_message_forwarded_verbatim() {
        let (mut warehouse, _) = client(vec![Err(TransportError::Http {
            status: 422,
            body: r#"{"code":"000904","message":"SQL compilation error: error line 1 at position 7\ninvalid identifier 'FOO'","sqlState":"42000"}"#.to_string(),
        })]);
        let err = warehouse.execute("SELECT FOO").unwrap_err();
        assert_eq!(
            err.message,
            "SQL compilation error: error line 1 at position 7\ninvalid identifier 'FOO'"
        );
    }

    #[test]
    fn test_network_error_becomes_execution_error() {
        let (mut warehouse, _) = client(vec![Err(TransportError::Network(
            "connection reset".to_string(),
        ))]);
        let err = warehouse.execute("SELECT 1").unwrap_err();
        assert_eq!(err.message, "Network error: connection reset");
    }

    #[test]
    fn test_missing_token_env_is_configuration_error() {
        let mut cfg = config();
        cfg.token = "env:NOODLE_SNOWFLAKE_TEST_UNSET".to_string();
        let result = SnowflakeWarehouse::with_transport(&cfg, "https://sf.test", Transport::default());
        assert!(matches!(result, Err(WarehouseError::Configuration(_))));
    }

    #[test]
    fn test_empty_account_is_missing_value() {
        let mut cfg = config();
        cfg.account = String::new();
        let err = SnowflakeWarehouse::with_transport(&cfg, "https://sf.test", Transport::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing config value: warehouse.account"
        );
    }

    #[test]
    fn test_convert_cell_types() {
        let col = |kind: &str, scale: Option<i64>| RowType {
            name: "C".to_string(),
            kind: kind.to_string(),
            scale,
        };
        assert_eq!(convert_cell(None, &col("text", None)), Value::Null);
        assert_eq!(
            convert_cell(Some("7".to_string()), &col("fixed", Some(0))),
            Value::Integer(7)
        );
        assert_eq!(
            convert_cell(Some("7.25".to_string()), &col("FIXED", Some(2))),
            Value::Float(7.25)
        );
        assert_eq!(
            convert_cell(Some("1.0e3".to_string()), &col("real", None)),
            Value::Float(1000.0)
        );
        assert_eq!(
            convert_cell(Some("true".to_string()), &col("boolean", None)),
            Value::Bool(true)
        );
        assert_eq!(
            convert_cell(Some("1727740800.000000000".to_string()), &col("timestamp_ltz", Some(9))),
            Value::Text("1727740800.000000000".to_string())
        );
        assert_eq!(
            convert_cell(Some("abc".to_string()), &col("fixed", Some(0))),
            Value::Text("abc".to_string())
        );
    }
}
