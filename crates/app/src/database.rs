//! Database connection management

use std::{future::Future, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
    query, query_scalar,
};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

/// Idempotent DDL for the products table.
pub const CREATE_PRODUCTOS_TABLE_SQL: &str = include_str!("sql/create_productos_table.sql");

/// Connection and readiness settings for the products store.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub user: String,
    pub host: String,
    pub database: String,
    pub password: String,
    pub port: u16,

    /// Total connection attempts made by [`connect_with_retry`].
    pub connect_attempts: u32,

    /// Pause between failed connection attempts.
    pub retry_delay: Duration,

    /// Upper bound for pool acquisition and for every statement.
    pub statement_timeout: Duration,
}

impl ConnectionSettings {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Error raised when a statement outlives the configured timeout.
#[derive(Debug, Clone, Copy, Error)]
#[error("statement timed out after {0:?}")]
pub struct StatementTimeout(pub Duration);

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a single statement, giving up once the statement timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns [`StatementTimeout`] when the timeout elapses first; the inner
    /// result carries the statement's own outcome.
    pub async fn bounded<T, F>(
        &self,
        statement: F,
    ) -> Result<Result<T, sqlx::Error>, StatementTimeout>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        timeout(self.statement_timeout, statement)
            .await
            .map_err(|_elapsed| StatementTimeout(self.statement_timeout))
    }
}

/// Connect to `PostgreSQL` once.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(settings: &ConnectionSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(settings.statement_timeout)
        .connect_with(settings.connect_options())
        .await
}

/// Connect to `PostgreSQL`, polling until the server accepts connections.
///
/// # Errors
///
/// Returns the last connection error once every attempt has failed.
pub async fn connect_with_retry(settings: &ConnectionSettings) -> Result<PgPool, sqlx::Error> {
    let attempts = settings.connect_attempts.max(1);
    let mut attempt = 1;

    loop {
        match connect(settings).await {
            Ok(pool) => {
                info!(attempt, host = %settings.host, "connected to database");

                return Ok(pool);
            }
            Err(error) if attempt < attempts => {
                warn!(attempt, attempts, "database not reachable yet: {error}");

                sleep(settings.retry_delay).await;

                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Create the `productos` table if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the DDL statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    query(CREATE_PRODUCTOS_TABLE_SQL).execute(pool).await?;

    info!("productos table created or already present");

    Ok(())
}

/// Round-trip a trivial query to prove the store is reachable.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;

    Ok(())
}
