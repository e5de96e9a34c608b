//! Product Errors

use tracing::error;

use stockroom_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

pub(crate) const LIST_FAILED: &str = "Error al obtener productos";
pub(crate) const GET_FAILED: &str = "Error al obtener producto";
pub(crate) const CREATE_FAILED: &str = "Error al crear producto";
pub(crate) const UPDATE_FAILED: &str = "Error al actualizar producto";
pub(crate) const DELETE_FAILED: &str = "Error al eliminar producto";

pub(crate) const NOT_FOUND: &str = "Producto no encontrado";
pub(crate) const MISSING_FIELDS: &str = "Faltan campos requeridos";
pub(crate) const INVALID_DATA: &str = "Datos de producto no validos";

/// Map a service failure to its client-facing error.
///
/// `context` is the message returned for store failures; the underlying
/// error is only logged.
pub(crate) fn into_api_error(error: ProductsServiceError, context: &'static str) -> ApiError {
    match error {
        ProductsServiceError::NotFound => ApiError::not_found(NOT_FOUND),
        ProductsServiceError::MissingRequiredData => ApiError::bad_request(MISSING_FIELDS),
        ProductsServiceError::InvalidData => ApiError::bad_request(INVALID_DATA),
        ProductsServiceError::Timeout(source) => {
            error!("{context}: {source}");

            ApiError::internal(context)
        }
        ProductsServiceError::Sql(source) => {
            error!("{context}: {source}");

            ApiError::internal(context)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use salvo::http::StatusCode;
    use stockroom_app::database::StatementTimeout;

    use super::*;

    #[test]
    fn not_found_keeps_fixed_message() {
        let error = into_api_error(ProductsServiceError::NotFound, GET_FAILED);

        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "Producto no encontrado");
    }

    #[test]
    fn store_failures_only_expose_the_context() {
        let error = into_api_error(
            ProductsServiceError::Timeout(StatementTimeout(Duration::from_secs(5))),
            UPDATE_FAILED,
        );

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "Error al actualizar producto");
    }

    #[test]
    fn missing_data_is_a_bad_request() {
        let error = into_api_error(ProductsServiceError::MissingRequiredData, CREATE_FAILED);

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), MISSING_FIELDS);
    }
}
