mod audit_test;
mod connection_test;
mod query_test;

use db_console::audit::AuditLog;
use db_console::config::ConnectionCredentials;

/// Builds an audit log in a fresh temp directory.
pub fn test_audit() -> (tempfile::TempDir, AuditLog) {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path().join("app.log"));
    (dir, log)
}

/// The credentials used by the end-to-end scenarios.
pub fn demo_credentials() -> ConnectionCredentials {
    ConnectionCredentials::new("localhost", "shop", "root", "")
}

/// Parses DATABASE_URL into credentials for the live-MySQL tests.
pub fn live_credentials() -> Option<ConnectionCredentials> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let parsed = url::Url::parse(&url).ok()?;
    Some(ConnectionCredentials {
        host: parsed.host_str()?.to_string(),
        port: parsed.port().unwrap_or(3306),
        database: parsed.path().strip_prefix('/')?.to_string(),
        user: parsed.username().to_string(),
        password: parsed.password().unwrap_or_default().to_string(),
    })
}
