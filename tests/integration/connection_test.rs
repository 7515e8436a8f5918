//! Connection lifecycle integration tests.

use db_console::connection::ConnectionManager;
use db_console::db::DatabaseBackend;
use db_console::error::ConsoleError;

use super::{demo_credentials, live_credentials, test_audit};

fn mock_manager() -> (tempfile::TempDir, ConnectionManager) {
    let (dir, audit) = test_audit();
    let manager = ConnectionManager::new(demo_credentials(), DatabaseBackend::Mock, audit);
    (dir, manager)
}

#[tokio::test]
async fn test_every_connected_operation_requires_connect_first() {
    let (_dir, manager) = mock_manager();

    assert!(matches!(
        manager.list_tables().await.unwrap_err(),
        ConsoleError::NotConnected
    ));
    assert!(matches!(
        manager.execute("SELECT 1").await.unwrap_err(),
        ConsoleError::NotConnected
    ));
}

#[tokio::test]
async fn test_connect_act_disconnect_unit_of_work() {
    let (_dir, mut manager) = mock_manager();

    manager.connect().await.unwrap();
    assert!(manager.is_connected());

    let tables = manager.list_tables().await.unwrap();
    assert_eq!(tables, vec!["orders", "customers"]);

    manager.disconnect().await;
    assert!(!manager.is_connected());

    // Once disconnected the precondition guard applies again.
    assert!(matches!(
        manager.list_tables().await.unwrap_err(),
        ConsoleError::NotConnected
    ));
}

#[tokio::test]
async fn test_double_disconnect_does_not_fail() {
    let (_dir, mut manager) = mock_manager();

    manager.connect().await.unwrap();
    manager.disconnect().await;
    manager.disconnect().await;

    // Disconnecting a never-connected manager is also fine.
    let (_dir2, mut fresh) = mock_manager();
    fresh.disconnect().await;
}

#[tokio::test]
async fn test_audit_records_connection_lifecycle() {
    let (_dir, audit) = test_audit();
    let mut manager =
        ConnectionManager::new(demo_credentials(), DatabaseBackend::Mock, audit.clone());

    manager.connect().await.unwrap();
    manager.list_tables().await.unwrap();
    manager.disconnect().await;

    let contents = std::fs::read_to_string(audit.path()).unwrap();
    assert!(contents.contains("[INFO] Connection established"));
    assert!(contents.contains("[INFO] Table list fetched"));
    assert!(contents.contains(r#""count":2"#));
    assert!(contents.contains("[INFO] Connection closed"));
}

// --- Live MySQL tests (skipped unless DATABASE_URL is set) ---

#[tokio::test]
async fn test_live_connect_and_list_tables() {
    let Some(credentials) = live_credentials() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let (_dir, audit) = test_audit();

    let mut manager = ConnectionManager::new(credentials, DatabaseBackend::MySql, audit);
    manager.connect().await.unwrap();

    let tables = manager.list_tables().await.unwrap();
    assert!(!tables.is_empty(), "Expected at least one table");

    manager.disconnect().await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_error_is_connection_kind() {
    // Needs no server: the host cannot resolve.
    let (_dir, audit) = test_audit();

    let credentials = db_console::config::ConnectionCredentials::new(
        "invalid.host.that.does.not.exist.local",
        "shop",
        "root",
        "",
    );
    let mut manager = ConnectionManager::new(credentials, DatabaseBackend::MySql, audit);

    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Connection(_)));
    assert!(!manager.is_connected());
}
