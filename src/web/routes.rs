//! HTTP route registration.

use actix_web::web;

use super::handlers;

/// Registers all console routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::index)
        .service(handlers::connect)
        .service(handlers::dashboard)
        .service(handlers::execute_form)
        .service(handlers::execute_quick)
        .service(handlers::disconnect);
}
