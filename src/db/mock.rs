//! Mock database client for testing.
//!
//! Provides an in-memory client that understands just enough SQL shape to
//! drive the console end to end without a live server: column projection and
//! LIMIT on SELECT, affected counts for DML, and unknown-table failures with
//! realistic SQLSTATE codes.

use super::{DatabaseClient, Row, StatementOutput, Value};
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;

/// A fixture table held by the mock.
#[derive(Debug, Clone)]
pub struct MockTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl MockTable {
    pub fn new(name: impl Into<String>, columns: Vec<&str>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(String::from).collect(),
            rows,
        }
    }
}

/// A mock database client backed by immutable fixture tables.
pub struct MockDatabaseClient {
    database: String,
    tables: Vec<MockTable>,
}

impl MockDatabaseClient {
    /// Creates a mock client with no tables.
    pub fn new() -> Self {
        Self {
            database: "shop".to_string(),
            tables: Vec::new(),
        }
    }

    /// Creates a mock client with the given fixture tables.
    pub fn with_tables(tables: Vec<MockTable>) -> Self {
        Self {
            database: "shop".to_string(),
            tables,
        }
    }

    /// Creates a mock client seeded with the demo `shop` fixtures.
    pub fn with_demo_data() -> Self {
        Self::with_tables(vec![
            MockTable::new(
                "orders",
                vec!["id", "customer_id", "total"],
                vec![
                    vec![Value::Int(1), Value::Int(1), Value::String("19.90".into())],
                    vec![Value::Int(2), Value::Int(2), Value::String("5.00".into())],
                    vec![Value::Int(3), Value::Int(1), Value::Null],
                ],
            ),
            MockTable::new(
                "customers",
                vec!["id", "name"],
                vec![
                    vec![Value::Int(1), Value::String("Alice".into())],
                    vec![Value::Int(2), Value::String("Bob".into())],
                ],
            ),
        ])
    }

    fn find_table(&self, name: &str) -> Result<&MockTable> {
        let name = name.trim_matches('`');
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ConsoleError::query(
                    format!("Table '{}.{}' doesn't exist", self.database, name),
                    "42S02",
                )
            })
    }

    fn select(&self, sql: &str) -> Result<StatementOutput> {
        let table_name = keyword_operand(sql, "FROM")
            .ok_or_else(|| syntax_error(sql))?;
        let table = self.find_table(&table_name)?;

        // ASCII-uppercase keeps byte offsets aligned with the original text.
        let upper = sql.to_ascii_uppercase();
        let projection_start = "SELECT".len();
        let projection_end = upper.find(" FROM ").ok_or_else(|| syntax_error(sql))?;
        let projection = sql[projection_start..projection_end].trim();

        let (columns, indices) = if projection == "*" {
            (
                table.columns.clone(),
                (0..table.columns.len()).collect::<Vec<_>>(),
            )
        } else {
            let mut columns = Vec::new();
            let mut indices = Vec::new();
            for part in projection.split(',') {
                let name = part.trim().trim_matches('`');
                let index = table
                    .columns
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(name))
                    .ok_or_else(|| {
                        ConsoleError::query(
                            format!("Unknown column '{name}' in 'field list'"),
                            "42S22",
                        )
                    })?;
                columns.push(table.columns[index].clone());
                indices.push(index);
            }
            (columns, indices)
        };

        let mut rows: Vec<Row> = table
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        if let Some(limit) = keyword_operand(sql, "LIMIT").and_then(|l| l.parse::<usize>().ok()) {
            rows.truncate(limit);
        }

        Ok(StatementOutput::RowSet { columns, rows })
    }

    fn show_tables(&self) -> StatementOutput {
        StatementOutput::RowSet {
            columns: vec![format!("Tables_in_{}", self.database)],
            rows: self
                .tables
                .iter()
                .map(|t| vec![Value::String(t.name.clone())])
                .collect(),
        }
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn execute_statement(&self, sql: &str) -> Result<StatementOutput> {
        let trimmed = sql.trim().trim_end_matches(';');
        let upper = trimmed.to_uppercase();

        if upper.starts_with("SELECT") {
            self.select(trimmed)
        } else if upper.starts_with("SHOW TABLES") {
            Ok(self.show_tables())
        } else if upper.starts_with("INSERT") {
            let table = keyword_operand(trimmed, "INTO").ok_or_else(|| syntax_error(trimmed))?;
            self.find_table(&table)?;
            Ok(StatementOutput::Affected(1))
        } else if upper.starts_with("UPDATE") {
            let table = keyword_operand(trimmed, "UPDATE").ok_or_else(|| syntax_error(trimmed))?;
            self.find_table(&table)?;
            // Fixtures are immutable; no row ever matches.
            Ok(StatementOutput::Affected(0))
        } else if upper.starts_with("DELETE") {
            let table = keyword_operand(trimmed, "FROM").ok_or_else(|| syntax_error(trimmed))?;
            self.find_table(&table)?;
            Ok(StatementOutput::Affected(0))
        } else if upper.starts_with("CREATE") || upper.starts_with("DROP") || upper.starts_with("ALTER")
        {
            Ok(StatementOutput::Affected(0))
        } else {
            Err(syntax_error(trimmed))
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Returns the word following `keyword` (case-insensitive), if present.
fn keyword_operand(sql: &str, keyword: &str) -> Option<String> {
    let upper = sql.to_ascii_uppercase();
    let needle = format!("{} ", keyword.to_ascii_uppercase());
    let at = if upper.starts_with(&needle) {
        0
    } else {
        upper.find(&format!(" {needle}"))? + 1
    };
    let rest = sql[at + needle.len()..].trim_start();
    let word: String = rest
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != ';' && *c != '(')
        .collect();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

fn syntax_error(sql: &str) -> ConsoleError {
    ConsoleError::query(
        format!(
            "You have an error in your SQL syntax; check the manual near '{}'",
            sql.chars().take(40).collect::<String>()
        ),
        "42000",
    )
}

/// A client whose statement executions always fail, for exercising the
/// failure-normalization path deterministically.
pub struct FailingDatabaseClient {
    message: String,
    code: String,
}

impl FailingDatabaseClient {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

impl Default for FailingDatabaseClient {
    fn default() -> Self {
        Self::new("Lost connection to MySQL server during query", "2013")
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Err(ConsoleError::query(self.message.clone(), self.code.clone()))
    }

    async fn execute_statement(&self, _sql: &str) -> Result<StatementOutput> {
        Err(ConsoleError::query(self.message.clone(), self.code.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
