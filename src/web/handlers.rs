//! Request handlers.
//!
//! Each page action follows the same unit of work: resolve credentials from
//! the session, build a fresh `ConnectionManager`, connect, act, disconnect,
//! render. Connections never outlive the request that opened them.

use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::config::ConnectionCredentials;
use crate::connection::ConnectionManager;
use crate::db::QueryOutcome;
use crate::error::{ConsoleError, Result};
use crate::render;
use crate::session::{create_logout_cookie, create_session_cookie, extract_session_token};

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct ConnectForm {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

/// SQL editor form fields.
#[derive(Debug, Deserialize)]
pub struct ExecuteForm {
    #[serde(default)]
    pub sql: String,
}

/// Sidebar quick-query parameter.
#[derive(Debug, Deserialize)]
pub struct QuickQuery {
    pub quick_query: Option<String>,
}

/// Shows the connection form, or goes straight to the dashboard when a
/// session already exists.
#[get("/")]
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if state.sessions.credentials_for(&req).is_some() {
        return redirect("/dashboard");
    }

    html_page("Connect — DB Console", &render::login_form(None))
}

/// Processes the connection form: validate, probe the connection, store the
/// credentials in the session, disconnect and redirect to the dashboard.
#[post("/connect")]
pub async fn connect(state: web::Data<AppState>, form: web::Form<ConnectForm>) -> HttpResponse {
    let form = form.into_inner();
    let credentials = ConnectionCredentials {
        host: form.host.trim().to_string(),
        port: 3306,
        database: form.database.trim().to_string(),
        user: form.user.trim().to_string(),
        password: form.password,
    };

    if credentials.validate().is_err() {
        return html_page(
            "Connect — DB Console",
            &render::login_form(Some("All fields are required (except password).")),
        );
    }

    let mut manager = ConnectionManager::new(
        credentials.clone(),
        state.backend,
        state.audit.clone(),
    );

    if let Err(e) = manager.connect().await {
        state.audit.error(
            "Connection failed",
            json!({
                "host": credentials.host,
                "database": credentials.database,
                "message": e.to_string(),
            }),
        );

        return html_page(
            "Connect — DB Console",
            &render::login_form(Some(&e.to_string())),
        );
    }

    // The probe served its purpose; the dashboard reconnects on its own.
    manager.disconnect().await;

    let token = state.sessions.create(credentials);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/dashboard"))
        .cookie(create_session_cookie(&token, &state.cookies))
        .finish()
}

/// Dashboard with the table list and an empty results area.
#[get("/dashboard")]
pub async fn dashboard(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(credentials) = state.sessions.credentials_for(&req) else {
        return Ok(redirect("/"));
    };

    let mut manager = ConnectionManager::new(credentials, state.backend, state.audit.clone());
    manager.connect().await.map_err(|e| unhandled(&state, e))?;

    let tables = match manager.list_tables().await {
        Ok(tables) => tables,
        Err(e) => {
            manager.disconnect().await;
            return Err(unhandled(&state, e));
        }
    };
    manager.disconnect().await;

    let database = manager.database().to_string();
    let body = render::dashboard(
        &tables,
        &database,
        &render::query_form(""),
        &render::empty_state(),
    );

    Ok(html_page(&format!("{database} — DB Console"), &body))
}

/// Executes the statement submitted through the SQL editor.
#[post("/execute")]
pub async fn execute_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<ExecuteForm>,
) -> Result<HttpResponse> {
    run_execute(req, state, form.into_inner().sql).await
}

/// Executes a sidebar quick query passed as a query parameter.
#[get("/execute")]
pub async fn execute_quick(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<QuickQuery>,
) -> Result<HttpResponse> {
    let sql = query.into_inner().quick_query.unwrap_or_default();
    run_execute(req, state, sql).await
}

async fn run_execute(
    req: HttpRequest,
    state: web::Data<AppState>,
    sql: String,
) -> Result<HttpResponse> {
    let Some(credentials) = state.sessions.credentials_for(&req) else {
        return Ok(redirect("/"));
    };

    let sql = sql.trim().to_string();

    let mut manager = ConnectionManager::new(credentials, state.backend, state.audit.clone());
    manager.connect().await.map_err(|e| unhandled(&state, e))?;

    let acted = act_on_connection(&manager, &sql).await;
    manager.disconnect().await;

    let (tables, results_area) = acted.map_err(|e| unhandled(&state, e))?;

    let database = manager.database().to_string();
    let body = render::dashboard(
        &tables,
        &database,
        &render::query_form(&sql),
        &results_area,
    );

    Ok(html_page(&format!("{database} — DB Console"), &body))
}

/// The connected portion of the execute flow, separated so the caller can
/// disconnect exactly once on both the success and error paths.
async fn act_on_connection(
    manager: &ConnectionManager,
    sql: &str,
) -> Result<(Vec<String>, String)> {
    let tables = manager.list_tables().await?;

    // An empty statement never reaches the executor.
    if sql.is_empty() {
        return Ok((tables, render::empty_state()));
    }

    let results_area = match manager.execute(sql).await? {
        QueryOutcome::Success(success) => render::results_table(&success),
        QueryOutcome::Failure(failure) => render::error_panel(&failure),
    };

    Ok((tables, results_area))
}

/// Drops the session and returns to the connection form.
#[get("/disconnect")]
pub async fn disconnect(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(token) = extract_session_token(&req) {
        state.sessions.remove(&token);
    }
    state
        .audit
        .info("Session closed by user", serde_json::Value::Null);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(create_logout_cookie(&state.cookies))
        .finish()
}

fn html_page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render::layout(title, body))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Records an error that is about to escape the handler into the audit log
/// before the `ResponseError` impl turns it into an error page.
fn unhandled(state: &AppState, e: ConsoleError) -> ConsoleError {
    state.audit.error(
        "Unhandled error",
        json!({ "category": e.category(), "message": e.to_string() }),
    );
    e
}
