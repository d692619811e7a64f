use catalog::model::{Product, Release};
use catalog_mirror::{Alert, SyncError};
use catalog_types::EntityId;

use super::List;
use crate::view::{self, ReleasesByProduct};
use crate::AppContext;

/// One product tile on the overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product_id: EntityId,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub status: String,
    pub created: String,
    /// Version of the newest release, if any.
    pub latest_release: Option<String>,
    pub active_licenses: usize,
}

const NO_DESCRIPTION: &str = "No description available";

impl ProductCard {
    fn build(product: &Product, groups: &ReleasesByProduct) -> Self {
        let latest = view::latest_release(groups, product.product_id)
            .map(|r| r.version.clone())
            .or_else(|| {
                let mut embedded = product.releases.clone();
                view::sort_newest_first(&mut embedded);
                embedded.into_iter().next().map(|r| r.version)
            });
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            description: product
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            status: product.status.clone().unwrap_or_default(),
            created: view::fmt_date(product.created_at.as_deref()),
            latest_release: latest,
            active_licenses: view::active_license_count(&product.licenses),
        }
    }
}

/// Landing page: searchable product cards and quick product creation.
pub struct OverviewPage {
    products: List<Product>,
    releases: List<Release>,
    pub search: String,
}

impl OverviewPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            products: List::new(ctx.api().products()),
            releases: List::new(ctx.api().releases()),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.products.load().await?;
        self.releases.load().await?;
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        self.products.items()
    }

    pub fn total_products(&self) -> usize {
        self.products.items().len()
    }

    /// Products matching the search box.
    pub fn filtered(&self) -> Vec<&Product> {
        view::search(self.products.items(), &self.search)
    }

    /// Cards for the filtered products.
    pub fn cards(&self) -> Vec<ProductCard> {
        let groups = view::group_releases(self.releases.items());
        self.filtered()
            .into_iter()
            .map(|p| ProductCard::build(p, &groups))
            .collect()
    }

    pub fn client_names(&self) -> Vec<String> {
        view::unique_client_names(self.products.items())
    }

    /// Create a product from the quick-add form. The seeded release the
    /// server returns is mirrored too.
    pub async fn create_product(
        &mut self,
        name: &str,
        sku: &str,
        description: &str,
    ) -> Result<Product, SyncError> {
        let mut product = Product::new(name, sku);
        if !description.trim().is_empty() {
            product.description = Some(description.trim().to_string());
        }
        let stored = self.products.create(&product).await?;
        for release in &stored.releases {
            self.releases.apply_created(release.clone());
        }
        Ok(stored)
    }

    /// Hand a product to the products page.
    pub fn open(&self, ctx: &mut AppContext, product_id: EntityId) -> bool {
        if !self.products.mirror().contains(product_id) {
            return false;
        }
        ctx.open_product(product_id);
        true
    }

    /// Alerts queued by the product and release lists.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        let mut alerts = self.products.take_alerts();
        alerts.extend(self.releases.take_alerts());
        alerts
    }
}
