//! Route registration: module routes plus the system endpoints.

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use catalog_core::Module;
use tracing::debug;

/// Build the complete router. Each module is nested under `/{name}`.
pub fn build_router(modules: &[Box<dyn Module>]) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for module in modules {
        app = app.nest(&format!("/{}", module.name()), module.routes());
    }

    app.layer(middleware::from_fn(log_request))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "catalogd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let resp = next.run(req).await;
    debug!(%method, path = %path, status = resp.status().as_u16(), "request");
    resp
}
