//! Update Product Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::products::{data::ProductUpdate, records::ProductId};

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::{INVALID_DATA, UPDATE_FAILED, into_api_error},
        get::ProductResponse,
    },
    state::State,
};

/// Update Product Request
///
/// Omitted fields keep their stored value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,

    #[serde(rename = "descripcion")]
    pub description: Option<String>,

    #[serde(rename = "precio")]
    #[salvo(schema(value_type = Option<f64>))]
    pub price: Option<Decimal>,

    pub stock: Option<i32>,
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        // A product always keeps a name; clearing it is not an update.
        if request.name.as_deref() == Some("") {
            return Err(ApiError::bad_request(INVALID_DATA));
        }

        Ok(ProductUpdate {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
        })
    }
}

/// Product Update Handler
#[endpoint(
    tags("productos"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, json, depot),
    fields(
        product_id = tracing::field::Empty,
        fields_count = tracing::field::Empty
    ),
    err(Debug)
)]
pub(crate) async fn handler(
    id: PathParam<i32>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>(UPDATE_FAILED)?;
    let update = ProductUpdate::try_from(json.into_inner())?;
    let product = ProductId::from_i32(id.into_inner());

    let fields_count = [
        update.name.is_some(),
        update.description.is_some(),
        update.price.is_some(),
        update.stock.is_some(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();

    let span = tracing::Span::current();

    span.record("product_id", tracing::field::display(product));
    span.record("fields_count", fields_count);

    let updated = state
        .app
        .products
        .update_product(product, update)
        .await
        .map_err(|error| into_api_error(error, UPDATE_FAILED))?;

    tracing::info!(product_id = %product, "updated product");

    Ok(Json(updated.into()))
}
