use catalog_types::{EntityId, RequiredFields, Resource, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// A site where a client runs the software.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLocation {
    #[serde(default)]
    pub client_location_id: EntityId,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,
}

/// Client: a customer organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub primary_contact: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default)]
    pub locations: Vec<ClientLocation>,

    #[serde(default)]
    pub product_ids: Vec<EntityId>,

    #[serde(default)]
    pub release_ids: Vec<EntityId>,

    #[serde(default)]
    pub update_log_ids: Vec<EntityId>,
}

impl Resource for Client {
    const NAME: &'static str = "client";
    const PATH: &'static str = "clients";

    fn id(&self) -> EntityId {
        self.client_id
    }
}

impl Validate for Client {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME)
            .text("name", &self.name)
            .text("email", &self.email)
            .text("primaryContact", &self.primary_contact)
            .finish()
    }
}

/// Assignment of a product to a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProduct {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default)]
    pub product_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<String>,
}

impl Resource for ClientProduct {
    const NAME: &'static str = "client product";
    const PATH: &'static str = "client-products";

    fn id(&self) -> EntityId {
        self.id
    }
}
