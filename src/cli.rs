//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use db_console::config::AppConfig;

/// A browser-based SQL administration console for MySQL.
#[derive(Parser, Debug)]
#[command(name = "dbconsole")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Audit log file path
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use the in-memory mock database (demo fixtures, for testing)
    #[arg(long)]
    pub mock_db: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path, using the platform default when the
    /// flag was not given.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::default_path)
    }

    /// Applies CLI overrides on top of a loaded configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.audit_log {
            config.audit.file_path = path.clone();
        }
    }
}
