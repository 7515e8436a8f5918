//! Audit log sink integration tests.

use db_console::audit::{AuditLevel, AuditLog};
use serde_json::json;

use super::test_audit;

#[test]
fn test_line_format_round_trips() {
    let (_dir, log) = test_audit();

    log.log(
        AuditLevel::Error,
        "SQL statement failed",
        json!({"errorCode": "42S02", "message": "Table 'shop.x' doesn't exist"}),
    );

    let contents = std::fs::read_to_string(log.path()).unwrap();
    let line = contents.lines().next().unwrap();

    // [<ISO-8601>] [<LEVEL>] <message> | <JSON context>
    let timestamp = line
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(ts, _)| ts)
        .unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    assert!(line.contains("] [ERROR] SQL statement failed | "));

    let context: serde_json::Value =
        serde_json::from_str(line.split(" | ").nth(1).unwrap()).unwrap();
    assert_eq!(context["errorCode"], "42S02");
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let (_dir, log) = test_audit();

    let writers: Vec<_> = (0..8)
        .map(|w| {
            let log = log.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    log.info(&format!("writer {w} entry {i}"), json!({"writer": w}));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let contents = std::fs::read_to_string(log.path()).unwrap();
    let lines: Vec<_> = contents.lines().collect();

    assert_eq!(lines.len(), 200);
    for line in lines {
        // Every line is whole: prefix parses and context parses.
        assert!(line.starts_with('['), "mangled line: {line}");
        assert!(line.contains("] [INFO] writer "), "mangled line: {line}");
        let context: serde_json::Value =
            serde_json::from_str(line.split(" | ").nth(1).unwrap()).unwrap();
        assert!(context["writer"].is_u64());
    }
}

#[test]
fn test_log_directory_created_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("app.log");
    let log = AuditLog::new(&path);

    log.info("first", serde_json::Value::Null);

    assert!(path.exists());
}
