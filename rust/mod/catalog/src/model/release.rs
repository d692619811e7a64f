use catalog_types::{EntityId, RequiredFields, Resource, Validate, ValidationError};
use serde::{Deserialize, Serialize};

use super::{Changelog, UpdateLog};

/// Release type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Major,
    #[default]
    Minor,
    ServicePack,
    Patch,
}

/// A downloadable build attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub artifact_id: EntityId,

    #[serde(default)]
    pub release_id: EntityId,

    #[serde(default)]
    pub file_url: String,

    /// Opaque digest, usually `sha256:<hex>`.
    #[serde(default)]
    pub hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Artifact {
    const NAME: &'static str = "artifact";
    const PATH: &'static str = "artifacts";

    fn id(&self) -> EntityId {
        self.artifact_id
    }
}

/// Another release this one requires. `depends_on` is carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDependency {
    #[serde(default)]
    pub release_dependency_id: EntityId,

    #[serde(default)]
    pub release_id: EntityId,

    #[serde(default)]
    pub depends_on_release_id: EntityId,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub depends_on: serde_json::Value,
}

impl Resource for ReleaseDependency {
    const NAME: &'static str = "dependency";
    const PATH: &'static str = "dependencies";

    fn id(&self) -> EntityId {
        self.release_dependency_id
    }
}

/// Release: one published (or planned) version of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default)]
    pub release_id: EntityId,

    #[serde(default)]
    pub product_id: EntityId,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub release_type: ReleaseType,

    /// Free-form lifecycle label (`draft`, `published`, `Planned`, ...).
    #[serde(default)]
    pub status: String,

    /// ISO-8601 date or date-time.
    #[serde(default)]
    pub release_date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub changelog: Changelog,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Filled in by the updates feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    #[serde(default)]
    pub update_logs: Vec<UpdateLog>,

    #[serde(default)]
    pub dependencies: Vec<ReleaseDependency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl Release {
    /// A fresh draft for `product_id`, as added from the releases page.
    pub fn draft(product_id: EntityId, version: &str, release_date: &str) -> Self {
        Release {
            product_id,
            version: version.to_string(),
            status: "draft".to_string(),
            release_date: release_date.to_string(),
            ..Default::default()
        }
    }
}

impl Resource for Release {
    const NAME: &'static str = "release";
    const PATH: &'static str = "releases";

    fn id(&self) -> EntityId {
        self.release_id
    }
}

impl Validate for Release {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME)
            .id("productId", self.product_id)
            .text("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_type_serde() {
        assert_eq!(
            serde_json::to_string(&ReleaseType::ServicePack).unwrap(),
            "\"service_pack\""
        );
        let t: ReleaseType = serde_json::from_str("\"major\"").unwrap();
        assert_eq!(t, ReleaseType::Major);
    }

    #[test]
    fn test_release_from_backend_json() {
        let json = r#"{
            "releaseId": 2,
            "productId": 1,
            "version": "1.0.0",
            "releaseType": "minor",
            "status": "draft",
            "releaseDate": "2024-03-01T10:00:00Z",
            "notes": "Auto-generated initial release",
            "changelog": ["event:Launch", "infra:New cluster"],
            "artifacts": [{
                "artifactId": 1,
                "releaseId": 2,
                "fileUrl": "https://example.com/default.bin",
                "hash": "sha256:autogenerated",
                "size": 1500000,
                "createdAt": "2024-03-01T10:00:00Z"
            }],
            "updateLogs": [],
            "dependencies": [{"releaseDependencyId": 1, "releaseId": 2, "dependsOnReleaseId": 1}]
        }"#;
        let r: Release = serde_json::from_str(json).unwrap();
        assert_eq!(r.id(), 2);
        assert_eq!(r.changelog.events(), vec!["Launch"]);
        assert_eq!(r.artifacts[0].size, 1_500_000);
        assert!(r.artifacts[0].signature.is_none());
        assert_eq!(r.dependencies[0].depends_on_release_id, 1);
    }

    #[test]
    fn test_release_validation() {
        assert!(Release::draft(1, "1.2.0", "2024-01-01").validate().is_ok());

        let err = Release::default().validate().unwrap_err();
        assert_eq!(err.missing, vec!["productId", "version"]);
    }

    #[test]
    fn test_artifact_roundtrip() {
        let a = Artifact {
            artifact_id: 4,
            release_id: 2,
            file_url: "https://cdn.example.com/a.bin".into(),
            hash: "sha256:ab".into(),
            signature: Some("sig".into()),
            size: 10,
            created_at: None,
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["fileUrl"], "https://cdn.example.com/a.bin");
        assert!(json.get("createdAt").is_none());
        let back: Artifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, a);
    }
}
