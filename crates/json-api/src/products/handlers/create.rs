//! Create Product Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use stockroom_app::domain::products::data::NewProduct;

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::{CREATE_FAILED, MISSING_FIELDS, into_api_error},
        get::ProductResponse,
    },
    state::State,
};

/// Create Product Request
///
/// `nombre`, `precio` and `stock` are required; `stock` may be zero.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,

    #[serde(rename = "descripcion")]
    pub description: Option<String>,

    #[serde(rename = "precio")]
    #[salvo(schema(value_type = Option<f64>))]
    pub price: Option<Decimal>,

    pub stock: Option<i32>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = ApiError;

    fn try_from(request: CreateProductRequest) -> Result<Self, Self::Error> {
        let name = request.name.filter(|name| !name.is_empty());

        let (Some(name), Some(price), Some(stock)) = (name, request.price, request.stock) else {
            return Err(ApiError::bad_request(MISSING_FIELDS));
        };

        Ok(NewProduct {
            name,
            description: request.description.unwrap_or_default(),
            price,
            stock,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("productos"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing required fields"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>(CREATE_FAILED)?;
    let product = NewProduct::try_from(json.into_inner())?;

    let created = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(|error| into_api_error(error, CREATE_FAILED))?;

    res.add_header(LOCATION, format!("/api/productos/{}", created.id), true)
        .or_500(CREATE_FAILED)?
        .status_code(StatusCode::CREATED);

    tracing::info!(product_id = %created.id, "created product");

    Ok(Json(created.into()))
}
