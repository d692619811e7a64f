use catalog_types::{parse_instant, EntityId, RequiredFields, Resource, Validate, ValidationError};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// License type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    #[default]
    Subscription,
    Perpetual,
}

/// Stored license status. Transitions are not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    #[default]
    Active,
    Expired,
    Revoked,
    Suspended,
}

impl LicenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LicenseStatus::Active => "active",
            LicenseStatus::Expired => "expired",
            LicenseStatus::Revoked => "revoked",
            LicenseStatus::Suspended => "suspended",
        }
    }
}

/// One entry of a license's audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAudit {
    pub license_audit_id: EntityId,
    pub action: String,
    pub timestamp: String,
}

/// Denormalized client/product reference carried on a license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, alias = "clientId", alias = "productId")]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// License: a client's right to use a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default)]
    pub license_id: EntityId,

    #[serde(default)]
    pub client_id: EntityId,

    #[serde(default)]
    pub product_id: EntityId,

    #[serde(default)]
    pub license_key: String,

    #[serde(rename = "type", default)]
    pub license_type: LicenseType,

    #[serde(default)]
    pub status: LicenseStatus,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,

    #[serde(default)]
    pub audits: Vec<LicenseAudit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<NamedRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<NamedRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl License {
    /// Whether `end_date` lies before `now`. Independent of the stored
    /// status, so an `active` license can still show as expired.
    /// An unparseable end date never counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        parse_instant(&self.end_date).is_some_and(|end| end < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }

    /// Next audit id: one past the largest, starting at 1.
    pub fn next_audit_id(&self) -> EntityId {
        self.audits
            .iter()
            .map(|a| a.license_audit_id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Append an audit entry stamped with `timestamp`.
    pub fn record_audit(&mut self, action: &str, timestamp: &str) {
        let entry = LicenseAudit {
            license_audit_id: self.next_audit_id(),
            action: action.to_string(),
            timestamp: timestamp.to_string(),
        };
        self.audits.push(entry);
    }
}

impl Resource for License {
    const NAME: &'static str = "license";
    const PATH: &'static str = "licenses";

    fn id(&self) -> EntityId {
        self.license_id
    }
}

impl Validate for License {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME)
            .id("clientId", self.client_id)
            .id("productId", self.product_id)
            .text("licenseKey", &self.license_key)
            .text("endDate", &self.end_date)
            .finish()
    }
}

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const KEY_LEN: usize = 16;

/// Random license key: 16 characters from `A-Z0-9` with a hyphen after
/// the eighth, e.g. `K3Q9ZP0A-7MXC2B1D`.
pub fn generate_license_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut key = String::with_capacity(KEY_LEN + 1);
    for i in 0..KEY_LEN {
        if i == KEY_LEN / 2 {
            key.push('-');
        }
        let idx = rng.gen_range(0..KEY_ALPHABET.len());
        key.push(KEY_ALPHABET[idx] as char);
    }
    key
}
