//! DB Console server binary.

mod cli;

use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use anyhow::Result;
use tracing::info;

use cli::Cli;
use db_console::audit::AuditLog;
use db_console::config::AppConfig;
use db_console::db::DatabaseBackend;
use db_console::web::{self, AppState};

#[actix_web::main]
async fn main() -> Result<()> {
    db_console::logging::init();

    let args = Cli::parse_args();

    let config_path = args.config_path();
    let mut config = AppConfig::load_from_file(&config_path)?;
    args.apply_to(&mut config);

    let backend = if args.mock_db {
        DatabaseBackend::Mock
    } else {
        DatabaseBackend::MySql
    };

    let audit = AuditLog::new(config.audit.file_path.clone());

    info!(
        "Starting DB Console v{} on {}:{} (backend: {})",
        env!("CARGO_PKG_VERSION"),
        config.server.host,
        config.server.port,
        backend.as_str()
    );
    info!("Audit log: {}", audit.path().display());

    let state = Data::new(AppState::new(audit, backend));
    let bind_addr = (config.server.host.clone(), config.server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(web::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
