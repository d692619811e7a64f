use std::sync::Arc;

use catalog::model::{
    Artifact, Client, ClientProduct, License, Notification, NotificationAdded, Product, Release,
    ReleaseDependency, Settings, UpdateLog, User, UserSaved,
};
use catalog_types::EntityId;
use reqwest::Method;
use serde::Deserialize;

use crate::transport::Transport;
use crate::{ApiError, ResourceClient, RetryPolicy};

/// Server used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "CATALOG_API_URL";

/// Entry point to the catalog REST API.
///
/// Cheap to clone; all clones share one connection pool.
///
/// ```no_run
/// # async fn run() -> Result<(), catalog_client::ApiError> {
/// use catalog_client::CatalogApi;
///
/// let api = CatalogApi::new("http://127.0.0.1:8000");
/// let products = api.products().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogApi {
    transport: Arc<Transport>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
    server_time: String,
}

impl CatalogApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_retry(base_url, RetryPolicy::none())
    }

    pub fn with_retry(base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(Transport::new(base_url, retry)),
        }
    }

    /// Base URL from `CATALOG_API_URL`, else [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        Self::new(&base_url_from_env())
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.transport.retry()
    }

    // ── Collections ──

    pub fn products(&self) -> ResourceClient<Product> {
        ResourceClient::new(self.transport.clone())
    }

    pub fn releases(&self) -> ResourceClient<Release> {
        ResourceClient::new(self.transport.clone())
    }

    pub fn clients(&self) -> ResourceClient<Client> {
        ResourceClient::new(self.transport.clone())
    }

    pub fn licenses(&self) -> ResourceClient<License> {
        ResourceClient::new(self.transport.clone())
    }

    pub fn artifacts(&self, release_id: EntityId) -> ResourceClient<Artifact> {
        ResourceClient::nested(self.transport.clone(), "releases", release_id)
    }

    pub fn update_logs(&self, release_id: EntityId) -> ResourceClient<UpdateLog> {
        ResourceClient::nested(self.transport.clone(), "releases", release_id)
    }

    pub fn dependencies(&self, release_id: EntityId) -> ResourceClient<ReleaseDependency> {
        ResourceClient::nested(self.transport.clone(), "releases", release_id)
    }

    /// Client/product assignments. List and remove only; create with
    /// [`CatalogApi::assign_product`].
    pub fn assignments(&self) -> ResourceClient<ClientProduct> {
        ResourceClient::new(self.transport.clone())
    }

    pub async fn assign_product(
        &self,
        client_id: EntityId,
        product_id: EntityId,
    ) -> Result<ClientProduct, ApiError> {
        let url = self
            .transport
            .api_url(&format!("clients/{}/assign/{}", client_id, product_id));
        self.transport.call::<(), _>(Method::POST, &url, None).await
    }

    // ── Settings ──

    pub async fn settings(&self) -> Result<Settings, ApiError> {
        let url = self.transport.api_url("settings");
        self.transport.call::<(), _>(Method::GET, &url, None).await
    }

    /// Save the user; returns the user echoed by the server.
    pub async fn save_user(&self, user: &User) -> Result<User, ApiError> {
        let url = self.transport.api_url("settings/user");
        let saved: UserSaved = self.transport.call(Method::POST, &url, Some(user)).await?;
        Ok(saved.user)
    }

    /// Add a notification; returns it with its server-assigned id.
    pub async fn add_notification(&self, notification: &Notification) -> Result<Notification, ApiError> {
        let url = self.transport.api_url("settings/notifications");
        let added: NotificationAdded = self
            .transport
            .call(Method::POST, &url, Some(notification))
            .await?;
        Ok(added.notification)
    }

    pub async fn delete_notification(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.transport.api_url(&format!("settings/notifications/{}", id));
        self.transport.call_empty(Method::DELETE, &url).await
    }

    // ── Misc ──

    /// Release feed with product names, newest first.
    pub async fn updates(&self) -> Result<Vec<Release>, ApiError> {
        let url = self.transport.api_url("updates");
        self.transport.call::<(), _>(Method::GET, &url, None).await
    }

    pub async fn server_time(&self) -> Result<String, ApiError> {
        let url = self.transport.api_url("time");
        let t: ServerTime = self.transport.call::<(), _>(Method::GET, &url, None).await?;
        Ok(t.server_time)
    }

    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.transport.url("health");
        self.transport.call::<(), _>(Method::GET, &url, None).await
    }
}

fn base_url_from_env() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
