//! JSON error responses.

use salvo::{
    catcher::Catcher,
    handler,
    http::{ResBody, StatusCode},
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{FlowCtrl, Json, Response},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};

use crate::products::errors::INVALID_DATA;

const ROUTE_NOT_FOUND: &str = "Recurso no encontrado";
const METHOD_NOT_ALLOWED: &str = "Metodo no permitido";
const INTERNAL_ERROR: &str = "Error interno del servidor";

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Reason shown to the client
    pub error: String,
}

/// HTTP failure rendered as `{ "error": message }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub(crate) const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub(crate) const fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) const fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) const fn internal(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) const fn message(&self) -> &'static str {
        self.message
    }

    /// Fallback for failures raised by salvo itself, such as a path or body
    /// that does not parse.
    fn from_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::BAD_REQUEST => INVALID_DATA,
            StatusCode::NOT_FOUND => ROUTE_NOT_FOUND,
            StatusCode::METHOD_NOT_ALLOWED => METHOD_NOT_ALLOWED,
            status if status.is_server_error() => INTERNAL_ERROR,
            status => status.canonical_reason().unwrap_or(INTERNAL_ERROR),
        };

        Self::new(status, message)
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            error: self.message.to_owned(),
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::NOT_FOUND, "Not Found"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ErrorResponse::to_schema(components)),
            );
        }
    }
}

/// Replace salvo's default error page with an [`ErrorResponse`] body.
///
/// Only runs for error responses that carry no body of their own, so
/// [`ApiError`] bodies pass through untouched.
#[handler]
async fn json_error_body(res: &mut Response, ctrl: &mut FlowCtrl) {
    let Some(status) = res.status_code else {
        return;
    };

    if !(res.body.is_none() || res.body.is_error()) {
        return;
    }

    res.replace_body(ResBody::None);
    res.render(ApiError::from_status(status));

    ctrl.skip_rest();
}

/// Catcher installed on every [`salvo::Service`] this crate builds.
pub(crate) fn catcher() -> Catcher {
    Catcher::default().hoop(json_error_body)
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn failing() -> Result<&'static str, ApiError> {
        Err(ApiError::not_found("Producto no encontrado"))
    }

    #[tokio::test]
    async fn renders_status_and_error_body() -> TestResult {
        let service = Service::new(Router::with_path("fail").get(failing));

        let mut res = TestClient::get("http://example.com/fail")
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.error, "Producto no encontrado");

        Ok(())
    }

    #[handler]
    async fn rejects_with_status_error(res: &mut Response) {
        res.render(StatusError::bad_request().brief("parse http data failed"));
    }

    #[tokio::test]
    async fn framework_errors_use_the_error_body() -> TestResult {
        let service = Service::new(Router::with_path("bad").get(rejects_with_status_error))
            .catcher(catcher());

        let mut res = TestClient::get("http://example.com/bad")
            .add_header("accept", "text/html", true)
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error, "Datos de producto no validos");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_use_the_error_body() -> TestResult {
        let service = Service::new(Router::with_path("fail").get(failing)).catcher(catcher());

        let mut res = TestClient::get("http://example.com/nowhere")
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.error, "Recurso no encontrado");

        Ok(())
    }
}
