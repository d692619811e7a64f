use catalog_core::{merge_fields, next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::release::NestedIds;
use super::{files, CatalogService};
use crate::model::{
    Artifact, ClientRef, Product, Release, ReleaseType, UpdateLog, UpdateLogStatus,
};

pub const DEFAULT_RELEASE_VERSION: &str = "1.0.0";
pub const DEFAULT_RELEASE_NOTES: &str = "Auto-generated initial release";
pub const DEFAULT_ARTIFACT_URL: &str = "https://example.com/default.bin";
pub const DEFAULT_ARTIFACT_HASH: &str = "sha256:autogenerated";
pub const DEFAULT_ARTIFACT_SIZE: u64 = 1_500_000;

impl CatalogService {
    pub async fn list_products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ServiceError> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.product_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Product"))
    }

    /// Create a product together with its initial draft release.
    ///
    /// The release carries one placeholder artifact and one completed
    /// update log. The response embeds that release; the stored product
    /// does not.
    pub async fn create_product(&self, mut product: Product) -> Result<Product, ServiceError> {
        let release = self
            .commit(&[files::RELEASES, files::PRODUCTS], |state| {
                let now = now_rfc3339();

                product.product_id = next_id(state.products.iter().map(|p| p.product_id));
                product.created_at = Some(now.clone());
                product.last_modified = Some(now.clone());

                let release_id = next_id(state.releases.iter().map(|r| r.release_id));
                let ids = NestedIds::next(&state.releases);

                let release = Release {
                    release_id,
                    product_id: product.product_id,
                    version: DEFAULT_RELEASE_VERSION.to_string(),
                    release_type: ReleaseType::Minor,
                    status: "draft".to_string(),
                    release_date: now.clone(),
                    notes: Some(DEFAULT_RELEASE_NOTES.to_string()),
                    artifacts: vec![Artifact {
                        artifact_id: ids.artifact,
                        release_id,
                        file_url: DEFAULT_ARTIFACT_URL.to_string(),
                        hash: DEFAULT_ARTIFACT_HASH.to_string(),
                        signature: None,
                        size: DEFAULT_ARTIFACT_SIZE,
                        created_at: Some(now.clone()),
                    }],
                    update_logs: vec![UpdateLog {
                        update_log_id: ids.update_log,
                        client_id: 1,
                        release_id,
                        installed_at: now.clone(),
                        status: UpdateLogStatus::Completed,
                        client: ClientRef {
                            client_id: 1,
                            name: "Default Client".to_string(),
                        },
                        ..Default::default()
                    }],
                    last_modified: Some(now),
                    ..Default::default()
                };

                state.releases.push(release.clone());
                state.products.push(product.clone());
                Ok(release)
            })
            .await?;

        info!(id = product.product_id, sku = %product.sku, "Product created");

        product.releases = vec![release];
        Ok(product)
    }

    /// Shallow-merge `patch` into the stored product.
    pub async fn update_product(
        &self,
        id: i64,
        patch: serde_json::Value,
    ) -> Result<Product, ServiceError> {
        self.commit(&[files::PRODUCTS], |state| {
            let slot = state
                .products
                .iter_mut()
                .find(|p| p.product_id == id)
                .ok_or_else(|| ServiceError::not_found("Product"))?;

            let mut merged = serde_json::to_value(&*slot)?;
            merge_fields(&mut merged, &patch);
            let mut updated: Product = serde_json::from_value(merged)
                .map_err(|e| ServiceError::Validation(format!("invalid product: {}", e)))?;
            updated.product_id = id;
            updated.last_modified = Some(now_rfc3339());
            *slot = updated.clone();
            Ok(updated)
        })
        .await
    }

    /// Delete a product. Its releases are left in place.
    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::PRODUCTS], |state| {
            let before = state.products.len();
            state.products.retain(|p| p.product_id != id);
            if state.products.len() == before {
                return Err(ServiceError::not_found("Product"));
            }
            Ok(())
        })
        .await?;
        info!(id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_seeds_default_release() {
        let svc = CatalogService::in_memory();
        let p = svc
            .create_product(Product::new("Analytics Pro", "ANPR-001"))
            .await
            .unwrap();
        assert_eq!(p.product_id, 1);
        assert!(p.created_at.is_some());
        assert_eq!(p.releases.len(), 1);

        let r = &p.releases[0];
        assert_eq!(r.version, "1.0.0");
        assert_eq!(r.status, "draft");
        assert_eq!(r.product_id, 1);
        assert_eq!(r.artifacts[0].size, 1_500_000);
        assert_eq!(r.artifacts[0].file_url, DEFAULT_ARTIFACT_URL);
        assert_eq!(r.update_logs[0].client.name, "Default Client");

        let stored = svc.get_product(1).await.unwrap();
        assert!(stored.releases.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_max_plus_one() {
        let svc = CatalogService::in_memory();
        svc.create_product(Product::new("A", "A-1")).await.unwrap();
        svc.create_product(Product::new("B", "B-1")).await.unwrap();
        svc.delete_product(1).await.unwrap();
        let c = svc.create_product(Product::new("C", "C-1")).await.unwrap();
        assert_eq!(c.product_id, 3);
        assert_eq!(c.releases[0].release_id, 3);
        assert_eq!(c.releases[0].artifacts[0].artifact_id, 3);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let svc = CatalogService::in_memory();
        let mut p = Product::new("A", "A-1");
        p.description = Some("first".into());
        svc.create_product(p).await.unwrap();

        let updated = svc
            .update_product(1, serde_json::json!({"name": "Renamed", "productId": 99}))
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.sku, "A-1");
        assert_eq!(updated.description.as_deref(), Some("first"));
        assert_eq!(updated.product_id, 1);
        assert!(updated.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let svc = CatalogService::in_memory();
        let err = svc
            .update_product(5, serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
        assert!(svc.delete_product(5).await.is_err());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_shape() {
        let svc = CatalogService::in_memory();
        svc.create_product(Product::new("A", "A-1")).await.unwrap();
        let err = svc
            .update_product(1, serde_json::json!({"releases": "nope"}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
