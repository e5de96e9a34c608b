//! App Router

use std::path::Path;

use salvo::{
    Router,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors, CorsHandler},
    serve_static::StaticDir,
};

use crate::{healthcheck, observability::metrics_handler, products};

/// Every route the server answers, with the landing page as the fallback.
pub(crate) fn app_router(public_dir: &Path) -> Router {
    Router::new()
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(
            Router::with_path("api/productos")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(static_files(public_dir))
}

/// Any origin, method and header.
///
/// Attach with `Service::hoop` so preflight requests are answered before routing.
pub(crate) fn cors() -> CorsHandler {
    Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
        .into_handler()
}

fn static_files(public_dir: &Path) -> Router {
    Router::with_path("{**path}").get(
        StaticDir::new([public_dir.to_path_buf()])
            .defaults("index.html")
            .auto_list(false),
    )
}
