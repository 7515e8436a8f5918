//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient`
//! trait using sqlx. Statements are always prepared server side (sqlx has no
//! client-side emulation), and the prepared statement's described column
//! count decides whether an execution produces a row set or an affected-row
//! count, the same way `SHOW`/`DESCRIBE`/`EXPLAIN`/`SELECT` are recognized
//! without parsing the SQL text.

use crate::config::ConnectionCredentials;
use crate::db::{DatabaseClient, Row, StatementOutput, Value};
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlColumn, MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, TypeInfo};
use std::time::Duration;
use tracing::debug;

/// How long to wait for the server to accept the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Fallback code when the driver reports no SQLSTATE.
const UNKNOWN_SQLSTATE: &str = "HY000";

/// MySQL database client.
///
/// The backing pool is capped at a single connection and lives for one
/// request unit of work; callers create it from session credentials, act,
/// and close it before responding.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Opens a connection from the given credentials.
    ///
    /// Fails with `ConsoleError::Connection` on authentication or network
    /// failure; connection errors are never retried.
    pub async fn connect(credentials: &ConnectionCredentials) -> Result<Self> {
        let conn_str = credentials.connection_string();

        debug!("Connecting to {}", credentials.display_string());

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(&conn_str)
            .await
            .map_err(|e| map_connection_error(e, credentials))?;

        Ok(Self { pool })
    }

    /// Creates a client from an existing pool. Primarily useful for testing.
    #[allow(dead_code)]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SHOW TABLES")
            .fetch_all(&self.pool)
            .await
            .map_err(map_statement_error)
    }

    async fn execute_statement(&self, sql: &str) -> Result<StatementOutput> {
        // Preparing first exposes the described column count before any row
        // is fetched, which is what distinguishes row-returning statements
        // from ones that only report an affected count.
        let statement = self
            .pool
            .prepare(sql)
            .await
            .map_err(map_statement_error)?;

        if statement.columns().is_empty() {
            let result = statement
                .query()
                .execute(&self.pool)
                .await
                .map_err(map_statement_error)?;
            return Ok(StatementOutput::Affected(result.rows_affected()));
        }

        let columns = column_names(statement.columns());
        let fetched = statement
            .query()
            .fetch_all(&self.pool)
            .await
            .map_err(map_statement_error)?;

        let rows: Vec<Row> = fetched.iter().map(convert_row).collect();

        Ok(StatementOutput::RowSet { columns, rows })
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Derives the ordered column name list from statement metadata, falling
/// back to a positional `col_<index>` placeholder when a name is missing.
fn column_names(columns: &[MySqlColumn]) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let name = col.name();
            if name.is_empty() {
                format!("col_{i}")
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| {
                // Values past i64::MAX keep full fidelity as text.
                i64::try_from(v)
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::String(v.to_string()))
            })
            .unwrap_or(Value::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        "DATETIME" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "TIMESTAMP" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // DECIMAL, VARCHAR, CHAR, TEXT, ENUM, SET, JSON and everything else:
        // try text first, then raw bytes.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .or_else(|| {
                row.try_get::<Option<Vec<u8>>, _>(index)
                    .ok()
                    .flatten()
                    .map(Value::Bytes)
            })
            .unwrap_or(Value::Null),
    }
}

/// Maps sqlx connection errors to user-facing messages.
fn map_connection_error(error: sqlx::Error, credentials: &ConnectionCredentials) -> ConsoleError {
    let host = &credentials.host;
    let port = credentials.port;
    let user = &credentials.user;
    let database = &credentials.database;

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ConsoleError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") || error_str.contains("authentication") {
        ConsoleError::connection(format!(
            "Access denied for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("unknown database") {
        ConsoleError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ConsoleError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be unreachable."
        ))
    } else {
        ConsoleError::connection(error.to_string())
    }
}

/// Maps a statement-level sqlx error to `ConsoleError::Query`, extracting the
/// SQLSTATE (or the MySQL error number when no SQLSTATE is reported).
fn map_statement_error(error: sqlx::Error) -> ConsoleError {
    match error.as_database_error() {
        Some(db_error) => {
            let code = db_error
                .code()
                .map(|c| c.to_string())
                .or_else(|| {
                    db_error
                        .try_downcast_ref::<MySqlDatabaseError>()
                        .map(|e| e.number().to_string())
                })
                .unwrap_or_else(|| UNKNOWN_SQLSTATE.to_string());

            ConsoleError::query(db_error.message(), code)
        }
        None => ConsoleError::query(error.to_string(), UNKNOWN_SQLSTATE),
    }
}
