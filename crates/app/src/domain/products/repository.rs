//! Products Repository

use jiff::tz::TimeZone;
use jiff_sqlx::DateTime as SqlxDateTime;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::products::{
    data::{NewProduct, ProductUpdate},
    records::{ProductId, ProductRecord},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        pool: &PgPool,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(pool)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        pool: &PgPool,
        product: ProductId,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_i32())
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        pool: &PgPool,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.stock)
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        pool: &PgPool,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_i32())
            .bind(update.name)
            .bind(update.description)
            .bind(update.price)
            .bind(update.stock)
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        pool: &PgPool,
        product: ProductId,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(DELETE_PRODUCT_SQL)
            .bind(product.into_i32())
            .fetch_one(pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        // `fecha_creacion` is a zone-less TIMESTAMP written by the server in UTC.
        let created_at = row
            .try_get::<SqlxDateTime, _>("fecha_creacion")?
            .to_jiff()
            .to_zoned(TimeZone::UTC)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "fecha_creacion".to_string(),
                source: Box::new(e),
            })?
            .timestamp();

        Ok(Self {
            id: ProductId::from_i32(row.try_get("id")?),
            name: row.try_get("nombre")?,
            description: row.try_get("descripcion")?,
            price: row.try_get("precio")?,
            stock: row.try_get("stock")?,
            created_at,
        })
    }
}
