use catalog_types::{EntityId, RequiredFields, Resource, Validate, ValidationError};
use serde::{Deserialize, Serialize};

use super::{License, Release};

/// A client row shown on a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductClient {
    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default)]
    pub client_name: String,
}

/// Product: a sellable software product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub product_id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub sku: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default)]
    pub releases: Vec<Release>,

    #[serde(default)]
    pub licenses: Vec<License>,

    #[serde(default)]
    pub clients: Vec<ProductClient>,
}

impl Product {
    pub fn new(name: &str, sku: &str) -> Self {
        Product {
            name: name.to_string(),
            sku: sku.to_string(),
            ..Default::default()
        }
    }
}

impl Resource for Product {
    const NAME: &'static str = "product";
    const PATH: &'static str = "products";

    fn id(&self) -> EntityId {
        self.product_id
    }
}

impl Validate for Product {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME)
            .text("name", &self.name)
            .text("sku", &self.sku)
            .finish()
    }
}
