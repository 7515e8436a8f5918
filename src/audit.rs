//! Append-only audit log.
//!
//! Records connections, statement executions, errors and timings as
//! single-line entries of the form
//! `[<ISO-8601 timestamp>] [<LEVEL>] <message> | <JSON context>`,
//! with the context clause omitted when empty. Writes happen under an
//! exclusive advisory file lock so concurrent requests never interleave
//! within a line; no ordering is guaranteed across requests.

use chrono::{Local, SecondsFormat};
use fs2::FileExt;
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Log severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// File-backed audit log sink.
///
/// The file and its parent directory are created lazily on first use. A
/// failed append is reported through tracing and otherwise swallowed; the
/// console never fails a request because its log could not be written.
#[derive(Debug, Clone)]
pub struct AuditLog {
    file_path: PathBuf,
}

impl AuditLog {
    /// Creates a sink that appends to the given file.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes one entry. `context` is a JSON object; pass
    /// `serde_json::Value::Null` (or an empty object) for none.
    pub fn log(&self, level: AuditLevel, message: &str, context: JsonValue) {
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);

        let context_clause = match &context {
            JsonValue::Null => String::new(),
            JsonValue::Object(map) if map.is_empty() => String::new(),
            other => format!(" | {other}"),
        };

        let entry = format!("[{timestamp}] [{level}] {message}{context_clause}\n");

        if let Err(e) = self.append(&entry) {
            warn!("Could not write audit log entry: {e}");
        }
    }

    /// Shortcut for INFO entries.
    pub fn info(&self, message: &str, context: JsonValue) {
        self.log(AuditLevel::Info, message, context);
    }

    /// Shortcut for WARNING entries.
    pub fn warning(&self, message: &str, context: JsonValue) {
        self.log(AuditLevel::Warning, message, context);
    }

    /// Shortcut for ERROR entries.
    pub fn error(&self, message: &str, context: JsonValue) {
        self.log(AuditLevel::Error, message, context);
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        FileExt::lock_exclusive(&file)?;
        let result = (&file).write_all(entry.as_bytes());
        let _ = FileExt::unlock(&file);
        result
    }
}
