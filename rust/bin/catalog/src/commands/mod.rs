pub mod context;
pub mod dashboard;
pub mod resource;

use std::path::Path;

use anyhow::Result;
use catalog_client::CatalogApi;
use catalog_dashboard::AppContext;
use catalog_mirror::{Alert, SyncError};
use tracing::debug;

use crate::config::ClientConfig;

/// Application context for the server the config (or
/// `CATALOG_API_URL`) points at.
pub(crate) fn connect(client_config_path: &Path) -> Result<AppContext> {
    let config = ClientConfig::load(client_config_path)?;
    let server = config.server_url()?;
    debug!(server = %server, "connecting");
    Ok(AppContext::new(CatalogApi::new(&server)))
}

/// The message a user sees for a failed page operation.
pub(crate) fn failed(err: SyncError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

/// Info alerts go to stdout; error alerts were already turned into the
/// command's error.
pub(crate) fn print_info(alerts: Vec<Alert>) {
    for alert in alerts.into_iter().filter(|a| !a.is_error()) {
        println!("{}", alert.message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::routing::get;
    use axum::{Json, Router};
    use catalog::CatalogService;
    use catalog_client::CatalogApi;
    use catalog_dashboard::AppContext;

    /// Context for a fresh in-memory server on an ephemeral port.
    pub async fn start() -> AppContext {
        let app = Router::new()
            .nest("/api", catalog::router(Arc::new(CatalogService::in_memory())))
            .route("/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = CatalogApi::new(&format!("http://{}", addr));
        for _ in 0..50 {
            if api.health().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        AppContext::new(api)
    }
}
