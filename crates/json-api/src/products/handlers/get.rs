//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::products::records::{ProductId, ProductRecord};

use crate::{
    errors::ApiError,
    extensions::*,
    products::errors::{GET_FAILED, into_api_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The store-assigned identifier of the product
    pub id: i32,

    /// The product name
    #[serde(rename = "nombre")]
    pub name: String,

    /// Free-form description, empty when none was given
    #[serde(rename = "descripcion")]
    pub description: Option<String>,

    /// The price with two decimal places, e.g. "9.99"
    #[serde(rename = "precio")]
    pub price: String,

    /// Units in stock
    pub stock: i32,

    /// The date and time the product was created
    #[serde(rename = "fecha_creacion")]
    pub created_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            id: product.id.into_i32(),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            stock: product.stock,
            created_at: product.created_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(
    tags("productos"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>(GET_FAILED)?;

    let product = state
        .app
        .products
        .get_product(ProductId::from_i32(id.into_inner()))
        .await
        .map_err(|error| into_api_error(error, GET_FAILED))?;

    Ok(Json(product.into()))
}
