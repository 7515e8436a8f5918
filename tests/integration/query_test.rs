//! Query execution and result normalization integration tests.
//!
//! Covers the end-to-end scenarios against the mock fixtures, plus the
//! normalization invariants and env-gated live-MySQL variants.

use db_console::connection::ConnectionManager;
use db_console::db::{DatabaseBackend, QueryOutcome, Value};
use pretty_assertions::assert_eq;
use std::time::Duration;

use super::{demo_credentials, live_credentials, test_audit};

async fn connected_mock_manager() -> (tempfile::TempDir, ConnectionManager) {
    let (dir, audit) = test_audit();
    let mut manager = ConnectionManager::new(demo_credentials(), DatabaseBackend::Mock, audit);
    manager.connect().await.unwrap();
    (dir, manager)
}

#[tokio::test]
async fn test_scenario_select_two_seeded_rows() {
    let (_dir, manager) = connected_mock_manager().await;

    let outcome = manager
        .execute("SELECT id, name FROM customers LIMIT 2")
        .await
        .unwrap();

    let QueryOutcome::Success(success) = outcome else {
        panic!("expected Success");
    };
    assert_eq!(success.columns, vec!["id".to_string(), "name".to_string()]);
    assert_eq!(success.row_count, 2);
    assert_eq!(
        success.rows,
        vec![
            vec![Value::Int(1), Value::String("Alice".to_string())],
            vec![Value::Int(2), Value::String("Bob".to_string())],
        ]
    );
}

#[tokio::test]
async fn test_scenario_delete_matching_nothing() {
    let (_dir, manager) = connected_mock_manager().await;

    let outcome = manager
        .execute("DELETE FROM customers WHERE id = 999")
        .await
        .unwrap();

    let QueryOutcome::Success(success) = outcome else {
        panic!("expected Success");
    };
    assert!(success.columns.is_empty());
    assert!(success.rows.is_empty());
    assert_eq!(success.row_count, 0);
}

#[tokio::test]
async fn test_scenario_insert_into_missing_table() {
    let (_dir, manager) = connected_mock_manager().await;

    let outcome = manager
        .execute("INSERT INTO nonexistent_table VALUES (1)")
        .await
        .unwrap();

    let QueryOutcome::Failure(failure) = outcome else {
        panic!("expected Failure");
    };
    assert_eq!(failure.error_code, "42S02");
    assert!(!failure.error_message.is_empty());
    assert!(failure.execution_time >= Duration::ZERO);
}

#[tokio::test]
async fn test_row_returning_invariants() {
    let (_dir, manager) = connected_mock_manager().await;

    for sql in ["SELECT * FROM orders", "SELECT * FROM customers", "SHOW TABLES"] {
        let outcome = manager.execute(sql).await.unwrap();
        let QueryOutcome::Success(success) = outcome else {
            panic!("expected Success for {sql}");
        };

        assert!(success.has_result_set(), "{sql} should describe columns");
        assert_eq!(success.row_count as usize, success.rows.len());
        for row in &success.rows {
            assert_eq!(row.len(), success.columns.len());
        }
    }
}

#[tokio::test]
async fn test_mutation_invariants() {
    let (_dir, manager) = connected_mock_manager().await;

    let outcome = manager
        .execute("INSERT INTO customers (id, name) VALUES (3, 'Carol')")
        .await
        .unwrap();

    let QueryOutcome::Success(success) = outcome else {
        panic!("expected Success");
    };
    assert!(success.columns.is_empty());
    assert!(success.rows.is_empty());
    assert_eq!(success.row_count, 1);
}

#[tokio::test]
async fn test_failure_keeps_full_message_while_log_truncates() {
    let (_dir, audit) = test_audit();
    let mut manager =
        ConnectionManager::new(demo_credentials(), DatabaseBackend::Mock, audit.clone());
    manager.connect().await.unwrap();

    let padding = "p".repeat(300);
    let sql = format!("SELECT * FROM nonexistent_table_{padding}");
    let outcome = manager.execute(&sql).await.unwrap();

    // Full table name (and with it the full SQL) reaches the caller.
    let QueryOutcome::Failure(failure) = outcome else {
        panic!("expected Failure");
    };
    assert!(failure.error_message.contains(&padding));

    // The audit entry holds at most 200 chars of SQL.
    let contents = std::fs::read_to_string(audit.path()).unwrap();
    let error_line = contents
        .lines()
        .find(|l| l.contains("SQL statement failed"))
        .unwrap();
    let context: serde_json::Value =
        serde_json::from_str(error_line.split(" | ").nth(1).unwrap()).unwrap();
    assert_eq!(context["sql"].as_str().unwrap().chars().count(), 200);
}

// --- Live MySQL tests (skipped unless DATABASE_URL is set) ---

async fn connected_live_manager() -> Option<(tempfile::TempDir, ConnectionManager)> {
    let credentials = live_credentials()?;
    let (dir, audit) = test_audit();
    let mut manager = ConnectionManager::new(credentials, DatabaseBackend::MySql, audit);
    manager.connect().await.ok()?;
    Some((dir, manager))
}

#[tokio::test]
async fn test_live_select_literal() {
    let Some((_dir, mut manager)) = connected_live_manager().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let outcome = manager
        .execute("SELECT 1 AS num, 'hello' AS greeting")
        .await
        .unwrap();

    let QueryOutcome::Success(success) = outcome else {
        panic!("expected Success");
    };
    assert_eq!(success.columns, vec!["num".to_string(), "greeting".to_string()]);
    assert_eq!(success.row_count, 1);
    assert_eq!(success.rows[0][0], Value::Int(1));

    manager.disconnect().await;
}

#[tokio::test]
async fn test_live_failing_statement_returns_failure() {
    let Some((_dir, mut manager)) = connected_live_manager().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let outcome = manager
        .execute("SELEC * FROM nowhere")
        .await
        .unwrap();

    let QueryOutcome::Failure(failure) = outcome else {
        panic!("expected Failure");
    };
    assert!(!failure.error_message.is_empty());
    assert!(!failure.error_code.is_empty());
    assert!(failure.execution_time >= Duration::ZERO);

    manager.disconnect().await;
}
