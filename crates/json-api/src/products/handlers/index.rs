//! Product Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::{LIST_FAILED, into_api_error},
        get::ProductResponse,
    },
    state::State,
};

/// Product Index Handler
///
/// Returns every product, newest first.
#[endpoint(tags("productos"), summary = "List Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>(LIST_FAILED)?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .map_err(|error| into_api_error(error, LIST_FAILED))?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use stockroom_app::{
        database::StatementTimeout,
        domain::products::{MockProductsService, ProductsServiceError},
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{make_product, products_service},
    };

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("api/productos").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_empty_list() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_list_products()
            .once()
            .return_once(|| Ok(vec![]));

        repo.expect_get_product().never();
        repo.expect_create_product().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();

        let mut res = TestClient::get("http://example.com/api/productos")
            .send(&make_service(repo))
            .await;

        let response: Vec<ProductResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(response.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_keeps_store_order() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_list_products()
            .once()
            .return_once(|| Ok(vec![make_product(3), make_product(2), make_product(1)]));

        let response: Vec<ProductResponse> = TestClient::get("http://example.com/api/productos")
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        let ids: Vec<i32> = response.iter().map(|product| product.id).collect();

        assert_eq!(ids, vec![3, 2, 1]);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_store_error_returns_500() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_list_products().once().return_once(|| {
            Err(ProductsServiceError::Timeout(StatementTimeout(
                Duration::from_secs(5),
            )))
        });

        let mut res = TestClient::get("http://example.com/api/productos")
            .send(&make_service(repo))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(body.error, "Error al obtener productos");

        Ok(())
    }
}
