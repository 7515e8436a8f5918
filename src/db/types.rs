//! Query result types for the console.
//!
//! Defines the structures used to represent the outcome of executing a SQL
//! statement, normalized so the presentation layer consumes successes and
//! failures through a single type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A row of data from a query result.
///
/// Values are positionally aligned with the `columns` list carried once at
/// the result level, so per-row key storage is avoided while lookup-by-name
/// stays possible through the column index.
pub type Row = Vec<Value>;

/// The normalized outcome of executing a single SQL statement.
///
/// Created once per execution, immutable thereafter. The executor guarantees
/// that driver failures surface as the `Failure` variant rather than as
/// errors, so a caller holding a `QueryOutcome` never needs a second error
/// path for statement-level problems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Success(QuerySuccess),
    Failure(QueryFailure),
}

/// Success payload.
///
/// Invariant: `columns` is empty if and only if the statement produced no
/// result set (INSERT/UPDATE/DELETE/DDL); `rows` is then empty and
/// `row_count` holds the driver-reported affected-row count. When `columns`
/// is non-empty, `row_count == rows.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySuccess {
    /// Ordered column names derived from result metadata.
    pub columns: Vec<String>,

    /// Rows of data, each aligned with `columns`.
    pub rows: Vec<Row>,

    /// Rows returned, or rows affected for column-less statements.
    pub row_count: u64,

    /// Time taken to execute the statement.
    #[serde(with = "duration_serde")]
    pub execution_time: Duration,
}

/// Failure payload carrying the driver error verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFailure {
    /// Driver error message, unsanitized.
    pub error_message: String,

    /// SQLSTATE-style error code.
    pub error_code: String,

    /// Time spent before the statement failed.
    #[serde(with = "duration_serde")]
    pub execution_time: Duration,
}

impl QueryOutcome {
    /// Builds a success outcome for a row-returning statement.
    pub fn rows(columns: Vec<String>, rows: Vec<Row>, execution_time: Duration) -> Self {
        let row_count = rows.len() as u64;
        Self::Success(QuerySuccess {
            columns,
            rows,
            row_count,
            execution_time,
        })
    }

    /// Builds a success outcome for a statement that only reports an
    /// affected-row count.
    pub fn affected(row_count: u64, execution_time: Duration) -> Self {
        Self::Success(QuerySuccess {
            columns: Vec::new(),
            rows: Vec::new(),
            row_count,
            execution_time,
        })
    }

    /// Builds a failure outcome.
    pub fn failure(
        error_message: impl Into<String>,
        error_code: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self::Failure(QueryFailure {
            error_message: error_message.into(),
            error_code: error_code.into(),
            execution_time,
        })
    }

    /// Returns true for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Time spent executing, regardless of variant.
    pub fn execution_time(&self) -> Duration {
        match self {
            Self::Success(s) => s.execution_time,
            Self::Failure(f) => f.execution_time,
        }
    }
}

impl QuerySuccess {
    /// True when the statement produced a result set (possibly empty).
    pub fn has_result_set(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// Represents a single value from a database query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to a string representation for display.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Serde support for Duration (not natively supported by serde).
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}
