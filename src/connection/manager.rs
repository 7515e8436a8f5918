//! Connection manager for the per-request database lifecycle.
//!
//! A manager is constructed fresh from explicit credentials for every
//! logical operation: connect, act, disconnect. Nothing here survives the
//! request, and no connection is ever shared across requests.

use serde_json::json;

use crate::audit::AuditLog;
use crate::config::ConnectionCredentials;
use crate::db::{self, DatabaseBackend, DatabaseClient, QueryOutcome};
use crate::error::{ConsoleError, Result};
use crate::query;

/// Owns at most one open database connection.
///
/// Every operation that needs the connection checks `is_connected` first and
/// fails with `ConsoleError::NotConnected` when the manager was never
/// connected; that is caller misuse, distinct from any database error.
pub struct ConnectionManager {
    credentials: ConnectionCredentials,
    backend: DatabaseBackend,
    audit: AuditLog,
    client: Option<Box<dyn DatabaseClient>>,
}

impl ConnectionManager {
    /// Creates a manager holding credentials but no connection yet.
    pub fn new(
        credentials: ConnectionCredentials,
        backend: DatabaseBackend,
        audit: AuditLog,
    ) -> Self {
        Self {
            credentials,
            backend,
            audit,
            client: None,
        }
    }

    /// Opens the connection.
    ///
    /// Fails with `ConsoleError::Connection` on authentication or network
    /// failure. Logs host, database and user on success; the password never
    /// reaches the log.
    pub async fn connect(&mut self) -> Result<()> {
        let client = db::connect(self.backend, &self.credentials).await?;
        self.client = Some(client);

        self.audit.info(
            "Connection established",
            json!({
                "host": self.credentials.host,
                "database": self.credentials.database,
                "user": self.credentials.user,
            }),
        );

        Ok(())
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// The database name these credentials target.
    pub fn database(&self) -> &str {
        &self.credentials.database
    }

    /// Lists the tables of the connected database in catalog order.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let client = self.ensure_connected()?;

        let tables = client.list_tables().await?;
        self.audit
            .info("Table list fetched", json!({ "count": tables.len() }));

        Ok(tables)
    }

    /// Executes one SQL statement, normalizing success and failure into a
    /// `QueryOutcome`. Only the missing-connection precondition surfaces as
    /// an error here; statement failures come back as
    /// `QueryOutcome::Failure`.
    pub async fn execute(&self, sql: &str) -> Result<QueryOutcome> {
        let client = self.ensure_connected()?;
        Ok(query::execute(client, sql, &self.audit).await)
    }

    /// Releases the connection. Safe to call when already disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                self.audit
                    .warning("Connection close failed", json!({ "message": e.to_string() }));
                return;
            }
        }
        self.audit.info("Connection closed", serde_json::Value::Null);
    }

    fn ensure_connected(&self) -> Result<&dyn DatabaseClient> {
        self.client.as_deref().ok_or(ConsoleError::NotConnected)
    }
}
