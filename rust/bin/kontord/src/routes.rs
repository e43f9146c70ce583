//! Route registration — system endpoints plus module routes.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Build the complete router.
///
/// Module routers already carry their own prefix (`/crm/v1`, ...), so
/// they merge in directly.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        tracing::info!(module = name, "routes mounted");
        app = app.merge(router);
    }

    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "kontord",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
