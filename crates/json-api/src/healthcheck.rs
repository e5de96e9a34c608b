//! Stockroom JSON API Health Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "OK" while the process serves requests
    pub status: String,

    /// Human-readable status line
    pub message: String,
}

/// Health handler
///
/// Reports liveness only; the database is not consulted.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Servidor funcionando correctamente".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_health() -> TestResult {
        let router = Router::new().push(Router::with_path("health").get(handler));

        let response: HealthResponse = TestClient::get("http://example.com/health")
            .send(&Service::new(router))
            .await
            .take_json()
            .await?;

        assert_eq!(response.status, "OK");
        assert_eq!(response.message, "Servidor funcionando correctamente");

        Ok(())
    }
}
