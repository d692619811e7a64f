use catalog::model::{Product, ProductClient};
use catalog_mirror::{Alert, SyncError};
use catalog_types::EntityId;

use super::List;
use crate::view;
use crate::AppContext;

/// Product list with a detail panel and an edit form.
///
/// The detail selection starts from [`AppContext::selected_product`] and
/// falls back to the first product.
pub struct ProductsPage {
    products: List<Product>,
    pub search: String,
}

impl ProductsPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            products: List::new(ctx.api().products()),
            search: String::new(),
        }
    }

    pub async fn load(&mut self, ctx: &AppContext) -> Result<usize, SyncError> {
        let count = self.products.load().await?;
        let wanted = ctx
            .selected_product()
            .filter(|id| self.products.mirror().contains(*id))
            .or_else(|| self.products.items().first().map(|p| p.product_id));
        match wanted {
            Some(id) => {
                self.products.select(id);
            }
            None => self.products.clear_selection(),
        }
        Ok(count)
    }

    pub fn products(&self) -> &[Product] {
        self.products.items()
    }

    pub fn filtered(&self) -> Vec<&Product> {
        view::search(self.products.items(), &self.search)
    }

    pub fn selected(&self) -> Option<&Product> {
        self.products.selected()
    }

    /// Show a product and remember it for the other pages.
    pub fn select(&mut self, ctx: &mut AppContext, id: EntityId) -> Option<&Product> {
        if self.products.mirror().contains(id) {
            ctx.open_product(id);
        }
        self.products.select(id)
    }

    pub fn open_new(&mut self) -> &mut Product {
        self.products.open_new()
    }

    pub fn open_edit(&mut self, id: EntityId) -> Result<&mut Product, SyncError> {
        self.products.open_edit(id)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Product> {
        self.products.draft_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.products.cancel_edit();
    }

    /// Append a client row to the open form.
    pub fn add_client_row(&mut self, client_id: EntityId, client_name: &str) -> bool {
        let Some(draft) = self.products.draft_mut() else {
            return false;
        };
        draft.clients.push(ProductClient {
            client_id,
            client_name: client_name.trim().to_string(),
        });
        true
    }

    pub fn remove_client_row(&mut self, index: usize) -> bool {
        match self.products.draft_mut() {
            Some(draft) if index < draft.clients.len() => {
                draft.clients.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Save the open form and show the stored product.
    pub async fn save(&mut self, ctx: &mut AppContext) -> Result<Product, SyncError> {
        let stored = self.products.save_buffer().await?;
        self.select(ctx, stored.product_id);
        Ok(stored)
    }

    /// Create directly from name, SKU and description.
    pub async fn create(
        &mut self,
        name: &str,
        sku: &str,
        description: Option<&str>,
    ) -> Result<Product, SyncError> {
        let mut product = Product::new(name, sku);
        product.description = description.map(str::to_string);
        self.products.create(&product).await
    }

    pub async fn delete(&mut self, ctx: &mut AppContext, id: EntityId) -> Result<(), SyncError> {
        self.products.remove(id).await?;
        if ctx.selected_product() == Some(id) {
            ctx.clear_product();
        }
        Ok(())
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.products.take_alerts()
    }
}
