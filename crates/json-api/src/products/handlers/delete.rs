//! Delete Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::products::records::ProductId;

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::{DELETE_FAILED, into_api_error},
        get::ProductResponse,
    },
    state::State,
};

const DELETED_MESSAGE: &str = "Producto eliminado correctamente";

/// Delete Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeleteProductResponse {
    pub message: String,

    /// The row as it was before deletion
    #[serde(rename = "producto")]
    pub product: ProductResponse,
}

/// Delete Product Handler
#[endpoint(
    tags("productos"),
    summary = "Delete Product",
    responses(
        (status_code = StatusCode::OK, description = "Product deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<Json<DeleteProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>(DELETE_FAILED)?;
    let product = ProductId::from_i32(id.into_inner());

    let deleted = state
        .app
        .products
        .delete_product(product)
        .await
        .map_err(|error| into_api_error(error, DELETE_FAILED))?;

    tracing::info!(product_id = %product, "deleted product");

    Ok(Json(DeleteProductResponse {
        message: DELETED_MESSAGE.to_string(),
        product: deleted.into(),
    }))
}
