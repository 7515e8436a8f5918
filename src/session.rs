//! Session storage for connection credentials.
//!
//! The "session" is an explicit key-value store keyed by a request-scoped
//! token, injected into the web layer rather than living as ambient global
//! state. It retains one `ConnectionCredentials` value per browser session;
//! the token travels in an HttpOnly cookie. No expiry policy is defined:
//! sessions last until the user disconnects or the server restarts.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::config::ConnectionCredentials;

/// Cookie name for the session token.
pub const SESSION_COOKIE_NAME: &str = "dbconsole_session";

/// Configuration for the session cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Whether to set the Secure flag (true when serving over HTTPS).
    pub secure: bool,
    /// Cookie path.
    pub path: String,
    /// SameSite policy.
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            path: "/".to_string(),
            // Lax keeps the sidebar quick-query links working after
            // cross-origin navigation while still blocking POSTs.
            same_site: SameSite::Lax,
        }
    }
}

/// In-memory session store: token → credentials.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, ConnectionCredentials>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores credentials under a fresh token and returns the token.
    pub fn create(&self, credentials: ConnectionCredentials) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(token.clone(), credentials);
        token
    }

    /// Looks up the credentials for a token.
    pub fn get(&self, token: &str) -> Option<ConnectionCredentials> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(token)
            .cloned()
    }

    /// Drops the session for a token. Unknown tokens are ignored.
    pub fn remove(&self, token: &str) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(token);
    }

    /// Resolves the credentials attached to a request, if any.
    pub fn credentials_for(&self, req: &HttpRequest) -> Option<ConnectionCredentials> {
        let token = extract_session_token(req)?;
        self.get(&token)
    }
}

/// Creates the HttpOnly session cookie carrying the given token.
pub fn create_session_cookie<'a>(token: &str, config: &CookieConfig) -> Cookie<'a> {
    Cookie::build(SESSION_COOKIE_NAME, token.to_string())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .finish()
}

/// Creates a cookie that clears the session cookie in the browser.
pub fn create_logout_cookie<'a>(config: &CookieConfig) -> Cookie<'a> {
    let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .finish();
    cookie.make_removal();
    cookie
}

/// Extracts the session token from request cookies.
pub fn extract_session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
}
