//! HTTP layer: application state, routes and request handlers.

mod handlers;
mod routes;

pub use routes::configure;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::sync::Arc;

use crate::audit::AuditLog;
use crate::db::DatabaseBackend;
use crate::error::ConsoleError;
use crate::render;
use crate::session::{CookieConfig, SessionStore};

/// Shared application state, injected into every handler.
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub audit: AuditLog,
    pub backend: DatabaseBackend,
    pub cookies: CookieConfig,
}

impl AppState {
    pub fn new(audit: AuditLog, backend: DatabaseBackend) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            audit,
            backend,
            cookies: CookieConfig::default(),
        }
    }
}

/// Errors that escape a handler become a rendered error page. Statement
/// failures never travel this path (the executor absorbs them); this is the
/// catch-all for connection and precondition errors the handlers did not
/// turn into a friendlier page themselves.
impl ResponseError for ConsoleError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("{}: {}", self.category(), self);

        let body = render::layout(
            "Error — DB Console",
            &render::internal_error_page(&self.to_string()),
        );

        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}
