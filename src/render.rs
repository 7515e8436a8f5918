//! HTML rendering for the console pages.
//!
//! All HTML the console serves is generated here, from plain data the core
//! hands over. Escaping happens at this boundary and nowhere earlier: the
//! query pipeline returns full-fidelity values and this module decides how
//! they appear, including the NULL marker and display truncation.

use crate::db::{QueryFailure, QuerySuccess, Value};

/// Displayed cell values are clipped to this many characters.
const DISPLAY_VALUE_LIMIT: usize = 100;

/// Full HTML5 shell around a page body. The title is treated as text; the
/// body is trusted markup produced by the other functions in this module.
pub fn layout(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
  :root {{ color-scheme: dark; }}
  * {{ box-sizing: border-box; }}
  body {{ margin: 0; background: #020617; color: #e2e8f0; font-family: system-ui, sans-serif; min-height: 100vh; }}
  a {{ color: inherit; text-decoration: none; }}
  .mono {{ font-family: ui-monospace, monospace; }}
  .card {{ background: #0f172a; border: 1px solid #1e293b; border-radius: 8px; }}
  .btn {{ display: inline-block; border: 0; border-radius: 6px; padding: 10px 16px; color: #fff; font-size: 14px; font-weight: 600; cursor: pointer; }}
  .btn-primary {{ background: #2563eb; }}
  .btn-primary:hover {{ background: #3b82f6; }}
  .btn-danger {{ background: #dc2626; }}
  .btn-danger:hover {{ background: #ef4444; }}
  .login-wrap {{ min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 16px; }}
  .login-card {{ width: 100%; max-width: 400px; padding: 24px; }}
  .login-card h1 {{ text-align: center; font-size: 22px; margin: 0 0 4px; }}
  .login-card .sub {{ text-align: center; color: #94a3b8; font-size: 13px; margin: 0 0 20px; }}
  .field {{ margin-bottom: 14px; }}
  .field label {{ display: block; font-size: 13px; color: #cbd5e1; margin-bottom: 5px; }}
  .field input {{ width: 100%; padding: 9px 12px; background: #1e293b; border: 1px solid #334155; border-radius: 6px; color: #e2e8f0; font-size: 14px; }}
  .field input:focus {{ outline: none; border-color: #3b82f6; }}
  .error-banner {{ background: rgba(127,29,29,.4); border: 1px solid #991b1b; border-radius: 6px; padding: 12px; margin-bottom: 16px; color: #fca5a5; font-size: 13px; }}
  .shell {{ display: flex; height: 100vh; overflow: hidden; }}
  .sidebar {{ width: 280px; flex-shrink: 0; background: #0f172a; border-right: 1px solid #1e293b; display: flex; flex-direction: column; }}
  .sidebar-header {{ padding: 16px; border-bottom: 1px solid #1e293b; }}
  .sidebar-header .db {{ color: #94a3b8; font-size: 12px; }}
  .sidebar-tables {{ flex: 1; overflow-y: auto; padding: 12px; }}
  .sidebar-tables .heading {{ font-size: 11px; text-transform: uppercase; letter-spacing: .05em; color: #94a3b8; margin-bottom: 8px; }}
  .table-link {{ display: block; padding: 6px 10px; border-radius: 6px; font-size: 13px; color: #cbd5e1; }}
  .table-link:hover {{ background: #1e293b; }}
  .sidebar-footer {{ padding: 12px; border-top: 1px solid #1e293b; }}
  .main {{ flex: 1; display: flex; flex-direction: column; overflow: hidden; }}
  .query-area {{ border-bottom: 1px solid #1e293b; padding: 16px; }}
  .query-area textarea {{ width: 100%; padding: 12px; background: #0f172a; border: 1px solid #334155; border-radius: 8px; color: #e2e8f0; font-size: 14px; resize: vertical; }}
  .query-bar {{ display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px; }}
  .results-area {{ flex: 1; overflow: auto; padding: 16px; }}
  .status-ok {{ color: #4ade80; font-size: 13px; }}
  .status-err {{ color: #f87171; font-size: 13px; }}
  .meta {{ color: #94a3b8; font-size: 12px; }}
  table.results {{ width: 100%; border-collapse: collapse; }}
  table.results th {{ text-align: left; font-size: 12px; text-transform: uppercase; letter-spacing: .04em; color: #cbd5e1; background: #0f172a; padding: 10px 14px; border-bottom: 1px solid #334155; white-space: nowrap; }}
  table.results td {{ padding: 8px 14px; font-size: 13px; border-bottom: 1px solid #1e293b; white-space: nowrap; font-family: ui-monospace, monospace; }}
  table.results tr:hover td {{ background: rgba(51,65,85,.4); }}
  td .null {{ color: #64748b; font-style: italic; }}
  .error-card {{ background: rgba(127,29,29,.25); border: 1px solid rgba(153,27,27,.6); border-radius: 8px; overflow: hidden; }}
  .error-card .head {{ padding: 10px 16px; border-bottom: 1px solid rgba(153,27,27,.4); color: #fca5a5; font-weight: 600; font-size: 14px; }}
  .error-card .body {{ padding: 16px; }}
  .error-card .label {{ font-size: 11px; text-transform: uppercase; letter-spacing: .05em; color: #94a3b8; }}
  .error-card pre {{ margin: 4px 0 12px; padding: 10px 12px; background: rgba(69,10,10,.5); border-radius: 6px; color: #fca5a5; font-size: 13px; white-space: pre-wrap; word-break: break-all; }}
  .empty {{ display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; color: #64748b; text-align: center; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Connection form, optionally with an error banner.
pub fn login_form(error_message: Option<&str>) -> String {
    let error_html = match error_message {
        Some(message) => format!(
            r#"<div class="error-banner">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="login-wrap">
  <div class="card login-card">
    <h1>DB Console</h1>
    <p class="sub">SQL administration console</p>
    {error_html}
    <form method="POST" action="/connect">
      <div class="field">
        <label for="host">Host</label>
        <input type="text" id="host" name="host" value="localhost" required>
      </div>
      <div class="field">
        <label for="database">Database</label>
        <input type="text" id="database" name="database" placeholder="database_name" required>
      </div>
      <div class="field">
        <label for="user">User</label>
        <input type="text" id="user" name="user" value="root" required>
      </div>
      <div class="field">
        <label for="password">Password</label>
        <input type="password" id="password" name="password" placeholder="••••••••">
      </div>
      <button type="submit" class="btn btn-primary" style="width:100%">Connect</button>
    </form>
  </div>
</div>"#
    )
}

/// Dashboard: sidebar with the table list plus the working area.
pub fn dashboard(tables: &[String], database: &str, query_area: &str, results_area: &str) -> String {
    format!(
        r#"<div class="shell">
  <aside class="sidebar">
    <div class="sidebar-header">
      <strong>DB Console</strong>
      <div class="db mono">{database}</div>
    </div>
    <div class="sidebar-tables">
      <div class="heading">Tables ({count})</div>
      {table_list}
    </div>
    <div class="sidebar-footer">
      <a href="/disconnect" class="btn btn-danger" style="display:block;text-align:center">Disconnect</a>
    </div>
  </aside>
  <main class="main">
    <div class="query-area">{query_area}</div>
    <div class="results-area">{results_area}</div>
  </main>
</div>"#,
        database = escape_html(database),
        count = tables.len(),
        table_list = table_list(tables),
    )
}

/// Clickable table list for the sidebar. Each entry links to a quick
/// `SELECT * ... LIMIT 50` against that table.
pub fn table_list(tables: &[String]) -> String {
    if tables.is_empty() {
        return r#"<p class="meta" style="font-style:italic">No tables found.</p>"#.to_string();
    }

    let items: String = tables
        .iter()
        .map(|table| {
            let quick_query = urlencode(&format!("SELECT * FROM `{table}` LIMIT 50"));
            format!(
                r#"<a class="table-link mono" href="/execute?quick_query={quick_query}">{name}</a>"#,
                name = escape_html(table),
            )
        })
        .collect();

    format!("<nav>{items}</nav>")
}

/// SQL editor with the previously submitted statement preserved.
pub fn query_form(previous_sql: &str) -> String {
    format!(
        r#"<form method="POST" action="/execute" id="queryForm">
  <div class="query-bar">
    <strong style="font-size:14px">SQL Editor</strong>
    <span>
      <span class="meta">Ctrl + Enter to run&nbsp;&nbsp;</span>
      <button type="submit" class="btn btn-primary">Run</button>
    </span>
  </div>
  <textarea name="sql" id="sqlEditor" rows="5" placeholder="SELECT * FROM table LIMIT 10;">{sql}</textarea>
</form>
<script>
  document.getElementById('sqlEditor').addEventListener('keydown', function(e) {{
    if (e.ctrlKey && e.key === 'Enter') {{
      e.preventDefault();
      document.getElementById('queryForm').submit();
    }}
  }});
</script>"#,
        sql = escape_html(previous_sql),
    )
}

/// Result table, or the affected-rows card for column-less successes.
pub fn results_table(success: &QuerySuccess) -> String {
    let time_ms = format!("{:.2}", success.execution_time.as_secs_f64() * 1000.0);

    if !success.has_result_set() {
        return format!(
            r#"<div class="card" style="padding:20px">
  <p class="status-ok" style="margin:0 0 4px">Statement executed successfully</p>
  <p class="meta" style="margin:0">{count} row(s) affected · {time_ms} ms</p>
</div>"#,
            count = success.row_count,
        );
    }

    let header_cells: String = success
        .columns
        .iter()
        .map(|col| format!("<th>{}</th>", escape_html(col)))
        .collect();

    let body_rows: String = success
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(render_cell).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        r#"<div>
  <p><span class="status-ok">Success</span> <span class="meta">· {count} row(s) · {time_ms} ms · {column_count} column(s)</span></p>
  <div class="card" style="overflow-x:auto">
    <table class="results">
      <thead><tr>{header_cells}</tr></thead>
      <tbody>{body_rows}</tbody>
    </table>
  </div>
</div>"#,
        count = success.row_count,
        column_count = success.columns.len(),
    )
}

/// Error panel with the driver code and message.
pub fn error_panel(failure: &QueryFailure) -> String {
    let time_ms = format!("{:.2}", failure.execution_time.as_secs_f64() * 1000.0);

    format!(
        r#"<div>
  <p><span class="status-err">Error</span> <span class="meta">· {time_ms} ms</span></p>
  <div class="error-card">
    <div class="head">SQL Execution Error</div>
    <div class="body">
      <div class="label">SQLSTATE</div>
      <pre>{code}</pre>
      <div class="label">Message</div>
      <pre>{message}</pre>
    </div>
  </div>
</div>"#,
        code = escape_html(&failure.error_code),
        message = escape_html(&failure.error_message),
    )
}

/// Placeholder shown before any statement ran.
pub fn empty_state() -> String {
    r#"<div class="empty">
  <p style="font-size:14px;margin:0">Write a SQL statement to get started</p>
  <p class="meta" style="margin:4px 0 0">Or click a table in the sidebar to browse it</p>
</div>"#
        .to_string()
}

/// Full-page panel for errors that escaped a handler.
pub fn internal_error_page(message: &str) -> String {
    format!(
        r#"<div class="login-wrap">
  <div class="card login-card" style="text-align:center">
    <h1>Internal Error</h1>
    <p class="mono" style="color:#fca5a5;font-size:13px;word-break:break-all">{}</p>
    <a href="/" class="btn btn-primary" style="margin-top:12px">Back to start</a>
  </div>
</div>"#,
        escape_html(message)
    )
}

fn render_cell(value: &Value) -> String {
    if value.is_null() {
        return r#"<td><span class="null">NULL</span></td>"#.to_string();
    }

    let display = value.to_display_string();
    let clipped = truncate_display(&display);
    format!("<td>{}</td>", escape_html(&clipped))
}

/// Clips a display value to `DISPLAY_VALUE_LIMIT` characters with an
/// ellipsis marker. Truncation is display-only; the underlying result keeps
/// the full value.
fn truncate_display(value: &str) -> String {
    if value.chars().count() > DISPLAY_VALUE_LIMIT {
        let mut clipped: String = value.chars().take(DISPLAY_VALUE_LIMIT).collect();
        clipped.push('…');
        clipped
    } else {
        value.to_string()
    }
}

/// Escapes a string for safe interpolation into HTML text and attributes.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encodes a string for use in a query parameter.
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(*byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
