pub mod assignment;
pub mod client;
pub mod license;
pub mod product;
pub mod release;
pub mod settings;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use catalog_core::{ServiceConfig, ServiceError};

use crate::model::{Client, ClientProduct, License, Product, Release, Settings};

/// Collection file names under the data directory.
pub(crate) mod files {
    pub const PRODUCTS: &str = "products";
    pub const RELEASES: &str = "releases";
    pub const CLIENTS: &str = "clients";
    pub const LICENSES: &str = "licenses";
    pub const CLIENT_PRODUCTS: &str = "client_products";
    pub const SETTINGS: &str = "settings";
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Collections {
    pub products: Vec<Product>,
    pub releases: Vec<Release>,
    pub clients: Vec<Client>,
    pub licenses: Vec<License>,
    pub assignments: Vec<ClientProduct>,
    pub settings: Option<Settings>,
}

/// Catalog service: owns every collection and implements the REST
/// semantics on top of them.
///
/// Collections live in memory behind one `RwLock`. With a data directory
/// configured, each mutated collection is written back as
/// `{data_dir}/{name}.json` before the lock is released. A mutation only
/// becomes visible once every collection it touched has been written.
pub struct CatalogService {
    config: ServiceConfig,
    pub(crate) state: RwLock<Collections>,
}

impl CatalogService {
    /// Purely in-memory service with the default settings document.
    pub fn in_memory() -> Self {
        Self {
            config: ServiceConfig::default(),
            state: RwLock::new(Collections {
                settings: Some(Settings::seed()),
                ..Default::default()
            }),
        }
    }

    /// Open the service, loading any collection files that exist.
    pub async fn open(config: ServiceConfig) -> Result<Self, ServiceError> {
        if let Some(dir) = &config.data_dir {
            tokio::fs::create_dir_all(dir).await?;
            info!(dir = %dir.display(), "Catalog data directory");
        }

        let mut collections = Collections {
            products: load(&config, files::PRODUCTS).await?.unwrap_or_default(),
            releases: load(&config, files::RELEASES).await?.unwrap_or_default(),
            clients: load(&config, files::CLIENTS).await?.unwrap_or_default(),
            licenses: load(&config, files::LICENSES).await?.unwrap_or_default(),
            assignments: load(&config, files::CLIENT_PRODUCTS)
                .await?
                .unwrap_or_default(),
            settings: load(&config, files::SETTINGS).await?,
        };
        if collections.settings.is_none() {
            collections.settings = Some(Settings::seed());
        }

        info!(
            products = collections.products.len(),
            releases = collections.releases.len(),
            clients = collections.clients.len(),
            licenses = collections.licenses.len(),
            "Catalog loaded"
        );

        Ok(Self {
            config,
            state: RwLock::new(collections),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Apply `f` to a copy of the collections, write the `touched`
    /// collections from that copy, then publish it. When `f` or a write
    /// fails the live state is left as it was.
    pub(crate) async fn commit<R>(
        &self,
        touched: &[&str],
        f: impl FnOnce(&mut Collections) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let out = f(&mut next)?;
        for name in touched {
            self.persist_collection(name, &next).await?;
        }
        *state = next;
        Ok(out)
    }

    async fn persist_collection(&self, name: &str, c: &Collections) -> Result<(), ServiceError> {
        match name {
            files::PRODUCTS => self.persist(name, &c.products).await,
            files::RELEASES => self.persist(name, &c.releases).await,
            files::CLIENTS => self.persist(name, &c.clients).await,
            files::LICENSES => self.persist(name, &c.licenses).await,
            files::CLIENT_PRODUCTS => self.persist(name, &c.assignments).await,
            files::SETTINGS => self.persist(name, &c.settings).await,
            other => Err(ServiceError::Internal(format!("unknown collection {}", other))),
        }
    }

    /// Write one collection back to disk. No-op without a data directory.
    pub(crate) async fn persist<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<(), ServiceError> {
        let Some(path) = self.config.collection_file(name) else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(&path, json).await?;
        debug!(path = %path.display(), "Collection saved");
        Ok(())
    }
}

async fn load<T: DeserializeOwned>(
    config: &ServiceConfig,
    name: &str,
) -> Result<Option<T>, ServiceError> {
    let Some(path) = config.collection_file(name) else {
        return Ok(None);
    };
    read_json(&path).await
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ServiceError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {}", path.display(), e))
            })?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    #[tokio::test]
    async fn test_open_without_data_dir_seeds_settings() {
        let svc = CatalogService::open(ServiceConfig::default()).await.unwrap();
        let settings = svc.get_settings().await.unwrap();
        assert_eq!(settings.user.user_id, 1);
        assert!(settings.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_persisted_collections_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let svc = CatalogService::open(config.clone()).await.unwrap();
        let created = svc
            .create_product(Product::new("Analytics Pro", "ANPR-001"))
            .await
            .unwrap();
        assert!(dir.path().join("products.json").exists());
        assert!(dir.path().join("releases.json").exists());
        drop(svc);

        let reopened = CatalogService::open(config).await.unwrap();
        let products = reopened.list_products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, created.product_id);
        assert_eq!(reopened.list_releases().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config = ServiceConfig {
            data_dir: Some(data_dir.clone()),
            ..Default::default()
        };
        let svc = CatalogService::open(config).await.unwrap();
        std::fs::remove_dir_all(&data_dir).unwrap();

        let client = crate::model::Client {
            name: "Acme".into(),
            email: "a@acme.com".into(),
            primary_contact: "Jo".into(),
            ..Default::default()
        };
        let err = svc.create_client(client).await.err().unwrap();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(svc.list_clients().await.is_empty());

        assert!(svc.create_product(Product::new("Suite", "S-1")).await.is_err());
        assert!(svc.list_products().await.is_empty());
        assert!(svc.list_releases().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clients.json"), b"{not json").unwrap();
        let config = ServiceConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = CatalogService::open(config).await.err().unwrap();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
