//! Server configuration module

use clap::Parser;
use stockroom_app::config::DatabaseConfig;

use crate::config::{observability::LoggingConfig, server::ServerRuntimeConfig};

pub(crate) mod observability;
pub(crate) mod server;

/// Stockroom JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "stockroom-json", about = "Stockroom JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Products database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn flags_are_grouped_by_section() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "stockroom-json",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--log-format",
            "json",
            "--db-name",
            "inventory",
        ])?;

        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert!(matches!(
            config.logging.log_format,
            observability::LogFormat::Json
        ));
        assert_eq!(config.database.settings().database, "inventory");

        Ok(())
    }
}
