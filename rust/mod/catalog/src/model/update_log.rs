use catalog_types::{EntityId, Resource};
use serde::{Deserialize, Serialize};

/// Outcome of an installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateLogStatus {
    #[default]
    Completed,
    Failed,
    InProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRef {
    #[serde(default)]
    pub client_location_id: EntityId,

    #[serde(default)]
    pub name: String,
}

/// UpdateLog: a client installing a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLog {
    #[serde(default)]
    pub update_log_id: EntityId,

    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<EntityId>,

    #[serde(default)]
    pub release_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_location_id: Option<EntityId>,

    #[serde(default)]
    pub installed_at: String,

    #[serde(default)]
    pub status: UpdateLogStatus,

    #[serde(default)]
    pub client: ClientRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationRef>,
}

impl Resource for UpdateLog {
    const NAME: &'static str = "update log";
    const PATH: &'static str = "update-logs";

    fn id(&self) -> EntityId {
        self.update_log_id
    }
}
