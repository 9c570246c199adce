//! End-to-end tests over the real adapters and warehouse clients
//!
//! The HTTP layer is replaced by `FakeTransport` fed from fixtures; the
//! SQLite warehouse is a temporary file.

use std::path::PathBuf;

use noodle_analyst::config::SnowflakeConfig;
use noodle_analyst::llm::adapters::{OpenAiAdapter, StubAdapter};
use noodle_analyst::llm::ModelError;
use noodle_analyst::transport::{FakeTransport, HttpResponse, Transport, TransportError};
use noodle_analyst::warehouse::{SnowflakeWarehouse, SqliteWarehouse};
use noodle_analyst::{
    package, AnswerStatus, ChartKind, QueryPipeline, SchemaRegistry, Value, Warehouse,
};

fn load_fixture(name: &str) -> String {
    let path = PathBuf::from("tests/fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

fn create_seeded_db() -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("usage.db");

    let warehouse = SqliteWarehouse::open(&path).unwrap();
    warehouse
        .create_tables(&SchemaRegistry::cost_usage())
        .unwrap();
    for (name, credits) in [("ETL_WH", 30.0), ("BI_WH", 5.5), ("ETL_WH", 12.5)] {
        warehouse
            .conn()
            .execute(
                "INSERT INTO warehouse_metering_history (WAREHOUSE_NAME, CREDITS_USED) VALUES (?1, ?2)",
                rusqlite::params![name, credits],
            )
            .unwrap();
    }
    (temp_dir, path)
}

#[test]
fn test_openai_adapter_with_sqlite_warehouse() {
    let (_dir, path) = create_seeded_db();
    let mut warehouse = SqliteWarehouse::open_read_only(&path).unwrap();

    let (transport, fake) = Transport::fake(FakeTransport::with_responses(vec![
        Ok(HttpResponse::ok(&load_fixture("openai_completion_fenced.json"))),
        Ok(HttpResponse::ok(&load_fixture("openai_completion_explanation.json"))),
    ]));
    let adapter = OpenAiAdapter::with_transport(
        "https://llm.test/api/v1".to_string(),
        "anthropic/claude-3.5-sonnet".to_string(),
        "sk-test".to_string(),
        transport,
    );
    let registry = SchemaRegistry::cost_usage();
    let schema = registry.describe();
    let pipeline = QueryPipeline::new(adapter, registry);

    let outcome = pipeline.run("Which warehouses used the most credits?", &mut warehouse);

    let answer = outcome.answer().expect("success");
    assert!(answer.final_query.starts_with("SELECT WAREHOUSE_NAME"));
    assert_eq!(answer.repairs, 0);
    assert_eq!(answer.result.columns, vec!["WAREHOUSE_NAME", "CREDITS"]);
    assert_eq!(
        answer.result.rows,
        vec![
            vec![Value::Text("ETL_WH".to_string()), Value::Float(42.5)],
            vec![Value::Text("BI_WH".to_string()), Value::Float(5.5)],
        ]
    );
    assert!(answer
        .explanation
        .as_deref()
        .unwrap()
        .starts_with("Overview: total credits per warehouse."));

    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, "https://llm.test/api/v1/chat/completions");
    assert_eq!(requests[0].header("Authorization"), Some("Bearer sk-test"));

    let generation: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(generation["model"], "anthropic/claude-3.5-sonnet");
    assert_eq!(generation["messages"][0]["role"], "system");
    assert!(generation["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains(&schema));
    assert_eq!(generation["messages"][1]["role"], "user");
    assert_eq!(
        generation["messages"][1]["content"],
        "Which warehouses used the most credits?"
    );

    let explanation: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(explanation["messages"].as_array().unwrap().len(), 1);
    assert!(explanation["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains(&answer.final_query));

    let view = package(&outcome);
    assert_eq!(view.status, AnswerStatus::Success);
    let chart = view.chart.expect("chart");
    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.x, "WAREHOUSE_NAME");
    assert_eq!(chart.y, "CREDITS");
}

#[test]
fn test_sqlite_error_text_drives_repair() {
    let (_dir, path) = create_seeded_db();
    let mut warehouse = SqliteWarehouse::open_read_only(&path).unwrap();

    let pipeline = QueryPipeline::new(
        StubAdapter::with_script(vec![
            Ok("SELECT CREDITS_BILLED FROM warehouse_metering_history".to_string()),
            Ok("SELECT SUM(CREDITS_USED) AS TOTAL FROM warehouse_metering_history".to_string()),
            Ok("Overview: total credits.".to_string()),
        ]),
        SchemaRegistry::cost_usage(),
    );

    let outcome = pipeline.run("total credits", &mut warehouse);

    let answer = outcome.answer().expect("success");
    assert_eq!(answer.repairs, 1);
    assert_eq!(answer.result.rows, vec![vec![Value::Float(48.0)]]);

    let calls = pipeline.adapter().calls();
    assert!(calls[1].system.contains("no such column: CREDITS_BILLED"));
}

#[test]
fn test_read_only_sqlite_rejects_writes_that_pass_prefix_gate() {
    let (_dir, path) = create_seeded_db();
    let mut warehouse = SqliteWarehouse::open_read_only(&path).unwrap();

    let direct = warehouse.execute("DELETE FROM warehouse_metering_history");
    assert!(direct.unwrap_err().message.contains("readonly"));
    // Passes the prefix gate; the read-only connection still protects the data
    let _ = warehouse.execute("SELECT 1; DELETE FROM warehouse_metering_history");

    let count = SqliteWarehouse::open_read_only(&path)
        .unwrap()
        .execute("SELECT COUNT(*) AS N FROM warehouse_metering_history")
        .unwrap();
    assert_eq!(count.rows, vec![vec![Value::Integer(3)]]);
}

fn snowflake_config() -> SnowflakeConfig {
    SnowflakeConfig {
        account: "xy12345.us-east-1".to_string(),
        token: "oauth-token".to_string(),
        token_type: "OAUTH".to_string(),
        database: "SNOWFLAKE".to_string(),
        schema: "ACCOUNT_USAGE".to_string(),
        warehouse: Some("COMPUTE_WH".to_string()),
        role: Some("ACCOUNTADMIN".to_string()),
        timeout_secs: 30,
        max_polls: 3,
        poll_interval_ms: 0,
    }
}

#[test]
fn test_snowflake_compilation_error_is_repaired() {
    let (transport, fake) = Transport::fake(FakeTransport::with_responses(vec![
        Err(TransportError::Http {
            status: 422,
            body: load_fixture("snowflake_compilation_error.json"),
        }),
        Ok(HttpResponse::ok(&load_fixture("snowflake_statement_complete.json"))),
    ]));
    let mut warehouse =
        SnowflakeWarehouse::with_transport(&snowflake_config(), "https://sf.test", transport)
            .unwrap();

    let pipeline = QueryPipeline::new(
        StubAdapter::with_script(vec![
            Ok("SELECT WAREHOUSE_NAME, SUM(CREDITS_BILLED) AS CREDITS FROM warehouse_metering_history GROUP BY 1".to_string()),
            Ok("```sql\nSELECT WAREHOUSE_NAME, SUM(CREDITS_USED) AS CREDITS FROM warehouse_metering_history GROUP BY 1\n```".to_string()),
            Err(ModelError::InvalidResponse("rate limited".to_string())),
        ]),
        SchemaRegistry::cost_usage(),
    );

    let outcome = pipeline.run("credits by warehouse", &mut warehouse);

    let answer = outcome.answer().expect("success");
    assert_eq!(answer.repairs, 1);
    assert_eq!(answer.explanation, None);
    assert_eq!(
        answer.result.rows,
        vec![
            vec![Value::Text("ETL_WH".to_string()), Value::Float(42.5)],
            vec![Value::Text("BI_WH".to_string()), Value::Float(7.25)],
        ]
    );

    let repair = &pipeline.adapter().calls()[1].system;
    assert!(repair.contains(
        "SQL compilation error: error line 1 at position 7\ninvalid identifier 'CREDITS_BILLED'"
    ));

    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(
        second["statement"],
        "SELECT WAREHOUSE_NAME, SUM(CREDITS_USED) AS CREDITS FROM warehouse_metering_history GROUP BY 1"
    );
    assert_eq!(second["role"], "ACCOUNTADMIN");
}
