//! The query execution boundary.
//!
//! Takes an arbitrary SQL string, runs it against a client, and shapes the
//! driver-level outcome into a `QueryOutcome`: a row set or an affected-row
//! count on success, the driver message and code on failure. Driver errors
//! never cross this boundary as errors.

use std::time::Instant;

use crate::audit::AuditLog;
use crate::db::{DatabaseClient, QueryOutcome, StatementOutput};
use crate::error::ConsoleError;
use serde_json::json;
use tracing::debug;

/// SQL is truncated to this many characters in audit entries. The outcome
/// handed back to the caller always carries full values.
pub const SQL_LOG_LIMIT: usize = 200;

/// Executes one SQL statement and normalizes the result.
///
/// The statement is submitted verbatim: no parsing, no splitting, no
/// parameter substitution. Whether it produced a row set is decided by the
/// driver's described column count, so `SELECT`, `SHOW`, `DESCRIBE` and
/// `EXPLAIN` are handled uniformly.
pub async fn execute(db: &dyn DatabaseClient, sql: &str, audit: &AuditLog) -> QueryOutcome {
    let start = Instant::now();
    let result = db.execute_statement(sql).await;
    let elapsed = start.elapsed();

    match result {
        Ok(StatementOutput::RowSet { columns, rows }) => {
            let outcome = QueryOutcome::rows(columns, rows, elapsed);
            log_success(audit, sql, &outcome);
            outcome
        }
        Ok(StatementOutput::Affected(count)) => {
            let outcome = QueryOutcome::affected(count, elapsed);
            log_success(audit, sql, &outcome);
            outcome
        }
        Err(e) => {
            let (message, code) = match e {
                ConsoleError::Query { message, code } => (message, code),
                other => (other.to_string(), "HY000".to_string()),
            };

            audit.error(
                "SQL statement failed",
                json!({
                    "sql": truncate_for_log(sql),
                    "errorCode": code,
                    "message": message,
                }),
            );
            debug!("Statement failed with code {code}");

            QueryOutcome::failure(message, code, elapsed)
        }
    }
}

fn log_success(audit: &AuditLog, sql: &str, outcome: &QueryOutcome) {
    let QueryOutcome::Success(success) = outcome else {
        return;
    };

    audit.info(
        "Statement executed",
        json!({
            "sql": truncate_for_log(sql),
            "rowCount": success.row_count,
            "executionTime": format!("{:.4}s", success.execution_time.as_secs_f64()),
        }),
    );
}

/// Clips SQL to `SQL_LOG_LIMIT` characters for log entries.
pub fn truncate_for_log(sql: &str) -> String {
    sql.chars().take(SQL_LOG_LIMIT).collect()
}
