//! Products service.

use std::future::Future;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductId, ProductRecord},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }

    async fn run<T, F>(&self, statement: F) -> Result<T, ProductsServiceError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        Ok(self.db.bounded(statement).await??)
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        self.run(self.repository.list_products(self.db.pool())).await
    }

    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError> {
        self.run(self.repository.get_product(self.db.pool(), product))
            .await
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.run(self.repository.create_product(self.db.pool(), product))
            .await
    }

    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.run(self.repository.update_product(self.db.pool(), product, update))
            .await
    }

    async fn delete_product(
        &self,
        product: ProductId,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.run(self.repository.delete_product(self.db.pool(), product))
            .await
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products, newest id first.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product; the store assigns its id and creation time.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Updates the supplied fields of a product, returning the stored row.
    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product, returning the row as it was before deletion.
    async fn delete_product(
        &self,
        product: ProductId,
    ) -> Result<ProductRecord, ProductsServiceError>;
}
