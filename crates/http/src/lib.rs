//! HTTP server facade for the catalog service: Axum router assembly, error
//! taxonomy, response envelopes, and OpenAPI/Swagger exposure.

use anyhow::Context;
use axum::{routing::get, Router};

use catalog_db::Db;
use catalog_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod response;
pub mod router;

pub use error::ApiError;
pub use response::{no_content, ApiResponse, Pagination};

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    db: &Db,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, db);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, db: &Db) -> Router {
    let mut router_builder = RouterBuilder::new();

    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    router_builder = router_builder.route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(module = module_name, "mounting routes under /api/{}", module_name);
        router_builder = router_builder.mount_module(module_name, module.routes(db));
    }

    router_builder = router_builder.with_openapi(registry).with_fallback();

    router_builder.build()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
