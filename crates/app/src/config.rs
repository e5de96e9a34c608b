//! Database Config

use std::time::Duration;

use clap::Args;

use crate::database::ConnectionSettings;

/// Database settings shared by the server and the operator CLI.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// `PostgreSQL` host
    #[arg(long, env = "DB_HOST", default_value = "db")]
    pub db_host: String,

    /// `PostgreSQL` database name
    #[arg(long, env = "DB_NAME", default_value = "cruddb")]
    pub db_name: String,

    /// `PostgreSQL` password
    #[arg(
        long,
        env = "DB_PASSWORD",
        default_value = "postgres123",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub db_password: String,

    /// `PostgreSQL` port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Connection attempts before startup gives up
    #[arg(long, env = "DB_CONNECT_ATTEMPTS", default_value_t = 10)]
    pub db_connect_attempts: u32,

    /// Delay between connection attempts, in milliseconds
    #[arg(
        long,
        env = "DB_CONNECT_RETRY_DELAY_MS",
        default_value_t = 1_000
    )]
    pub db_connect_retry_delay_ms: u64,

    /// Per-statement timeout, in milliseconds
    #[arg(
        long,
        env = "DB_STATEMENT_TIMEOUT_MS",
        default_value_t = 5_000
    )]
    pub db_statement_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Connection settings for [`crate::database`].
    #[must_use]
    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            user: self.db_user.clone(),
            host: self.db_host.clone(),
            database: self.db_name.clone(),
            password: self.db_password.clone(),
            port: self.db_port,
            connect_attempts: self.db_connect_attempts,
            retry_delay: Duration::from_millis(self.db_connect_retry_delay_ms),
            statement_timeout: Duration::from_millis(self.db_statement_timeout_ms),
        }
    }
}
