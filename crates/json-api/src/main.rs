//! Stockroom JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use stockroom_app::context::AppContext;

use crate::{
    config::ServerConfig,
    observability::request_logging,
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod errors;
mod extensions;
mod healthcheck;
mod observability;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Stockroom JSON API Server entry point
///
/// Exits with status 1 when configuration, logging or the database cannot be set up.
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    observability::init(&config.logging).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    });

    let settings = config.database.settings();

    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "connecting to PostgreSQL"
    );

    // The table must exist before the first request is accepted
    let app = match AppContext::from_settings(&settings).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .hoop(request_logging)
        .push(router::app_router(&config.server.public_dir));

    let doc = OpenApi::new("Stockroom API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    // Docs go in front of the static fallback so it cannot shadow them
    let router = Router::new()
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
        .push(router);

    let service = Service::new(router)
        .catcher(errors::catcher())
        .hoop(router::cors());

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(service).await;

    info!("server stopped");
}
