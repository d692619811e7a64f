use catalog_client::CatalogApi;
use catalog_types::EntityId;
use tracing::debug;

/// State shared by every page: the API handle and the product the user
/// last opened.
///
/// Opening a product on one page (the overview card, the releases list)
/// makes it the initial selection of the products page.
#[derive(Debug, Clone)]
pub struct AppContext {
    api: CatalogApi,
    product: Option<EntityId>,
}

impl AppContext {
    pub fn new(api: CatalogApi) -> Self {
        Self { api, product: None }
    }

    /// Context for the server named by `CATALOG_API_URL`.
    pub fn from_env() -> Self {
        Self::new(CatalogApi::from_env())
    }

    pub fn api(&self) -> &CatalogApi {
        &self.api
    }

    pub fn open_product(&mut self, product_id: EntityId) {
        debug!(product_id, "product opened");
        self.product = Some(product_id);
    }

    pub fn selected_product(&self) -> Option<EntityId> {
        self.product
    }

    pub fn clear_product(&mut self) {
        self.product = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_selection() {
        let mut ctx = AppContext::new(CatalogApi::new("http://h:1"));
        assert_eq!(ctx.selected_product(), None);
        ctx.open_product(4);
        ctx.open_product(7);
        assert_eq!(ctx.selected_product(), Some(7));
        ctx.clear_product();
        assert_eq!(ctx.selected_product(), None);
        assert_eq!(ctx.api().base_url(), "http://h:1");
    }
}
