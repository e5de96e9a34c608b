//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, ConnectionSettings, Db},
    domain::products::{PgProductsService, ProductsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to create the productos table")]
    Schema(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>) -> Self {
        Self { products }
    }

    /// Build application context once the database is reachable and the
    /// `productos` table exists.
    ///
    /// # Errors
    ///
    /// Returns an error when every connection attempt fails or the table
    /// cannot be created.
    pub async fn from_settings(settings: &ConnectionSettings) -> Result<Self, AppInitError> {
        let pool = database::connect_with_retry(settings)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_schema(&pool)
            .await
            .map_err(AppInitError::Schema)?;

        let db = Db::new(pool, settings.statement_timeout);

        Ok(Self::new(Arc::new(PgProductsService::new(db))))
    }
}
