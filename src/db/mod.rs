//! Database abstraction layer for the console.
//!
//! Provides a trait-based interface for database operations, allowing the
//! real MySQL backend and the in-memory mock to be used interchangeably.

mod mock;
mod mysql;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient, MockTable};
pub use mysql::MySqlClient;
pub use types::{QueryFailure, QueryOutcome, QuerySuccess, Row, Value};

use crate::config::ConnectionCredentials;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    MySql,
    /// In-memory mock with demo fixtures, for tests and `--mock-db` runs.
    Mock,
}

impl DatabaseBackend {
    /// Returns the backend as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Mock => "mock",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Some(Self::MySql),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// Creates a database client for the given backend and credentials.
///
/// This is the central factory function for database connections. Fails with
/// `ConsoleError::Connection` on authentication or network failure.
pub async fn connect(
    backend: DatabaseBackend,
    credentials: &ConnectionCredentials,
) -> Result<Box<dyn DatabaseClient>> {
    match backend {
        DatabaseBackend::MySql => {
            let client = MySqlClient::connect(credentials).await?;
            Ok(Box::new(client))
        }
        DatabaseBackend::Mock => Ok(Box::new(MockDatabaseClient::with_demo_data())),
    }
}

/// The driver-level result of one statement, before normalization.
///
/// The executor turns this (or the error it came with) into a `QueryOutcome`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutput {
    /// The statement described a column set; all rows were materialized.
    RowSet { columns: Vec<String>, rows: Vec<Row> },

    /// The statement described no columns; the driver reported an
    /// affected-row count instead.
    Affected(u64),
}

/// Trait defining the interface for database clients.
///
/// All operations are async and return Results with ConsoleError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Lists the table names of the connected database, in catalog order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Executes a single SQL statement verbatim.
    ///
    /// Statement-level driver failures come back as
    /// `ConsoleError::Query { message, code }`.
    async fn execute_statement(&self, sql: &str) -> Result<StatementOutput>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
