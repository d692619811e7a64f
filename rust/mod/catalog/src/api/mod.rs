pub mod assignment;
pub mod client;
pub mod license;
pub mod product;
pub mod release;
pub mod settings;

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use catalog_core::{now_rfc3339, Module};

use crate::service::CatalogService;

/// Shared application state.
pub type AppState = Arc<CatalogService>;

/// Build the catalog API router. Paths are relative to the `/api` prefix.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(product::routes())
        .merge(release::routes())
        .merge(client::routes())
        .merge(license::routes())
        .merge(settings::routes())
        .merge(assignment::routes())
        .route("/time", get(server_time))
        .with_state(state)
        .layer(middleware::from_fn(no_cache))
}

/// The catalog API as a server module mounted at `/api`.
pub struct CatalogModule {
    service: AppState,
}

impl CatalogModule {
    pub fn new(service: AppState) -> Self {
        Self { service }
    }
}

impl Module for CatalogModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        router(self.service.clone())
    }
}

async fn server_time() -> impl IntoResponse {
    Json(serde_json::json!({ "serverTime": now_rfc3339() }))
}

/// Every API response must be refetched; the dashboard never reads stale
/// collections from a cache.
async fn no_cache(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    resp
}

/// `{ "message": ... }` body used by delete endpoints.
pub(crate) fn message(text: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": text.into() }))
}
