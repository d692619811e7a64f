use catalog::model::{generate_license_key, License, LicenseStatus, LicenseType};
use catalog_mirror::{Alert, Alerts, SyncError};
use catalog_types::{now_rfc3339, EntityId};
use chrono::{DateTime, Utc};

use super::{drain, report, List};
use crate::AppContext;

/// Appended to the status of a license whose end date has passed.
pub const EXPIRED_MARKER: &str = "(Expired)";

const AUDIT_REGENERATED: &str = "regenerated key";
const AUDIT_REVOKED: &str = "revoked";

/// Editable license fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseEdit {
    pub client_id: EntityId,
    pub product_id: EntityId,
    pub license_key: String,
    pub license_type: LicenseType,
    pub status: LicenseStatus,
    pub start_date: String,
    pub end_date: String,
}

impl LicenseEdit {
    pub fn from_license(license: &License) -> Self {
        Self {
            client_id: license.client_id,
            product_id: license.product_id,
            license_key: license.license_key.clone(),
            license_type: license.license_type,
            status: license.status,
            start_date: license.start_date.clone(),
            end_date: license.end_date.clone(),
        }
    }

    /// `license` with the edited fields; audits and references are kept.
    pub fn apply_to(&self, license: &License) -> License {
        License {
            client_id: self.client_id,
            product_id: self.product_id,
            license_key: self.license_key.trim().to_string(),
            license_type: self.license_type,
            status: self.status,
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            ..license.clone()
        }
    }
}

/// Status text with the expiry marker. Expiry is derived from the end
/// date alone, so an `active` license past its end date reads
/// `active (Expired)`.
pub fn status_label(license: &License, now: DateTime<Utc>) -> String {
    if license.is_expired_at(now) {
        format!("{} {}", license.status.as_str(), EXPIRED_MARKER)
    } else {
        license.status.as_str().to_string()
    }
}

/// License list and detail with edit, key regeneration and revocation.
pub struct LicensesPage {
    licenses: List<License>,
    edit: Option<(EntityId, LicenseEdit)>,
    alerts: Alerts,
}

impl LicensesPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            licenses: List::new(ctx.api().licenses()),
            edit: None,
            alerts: Alerts::default(),
        }
    }

    pub async fn load(&mut self) -> Result<usize, SyncError> {
        self.licenses.load().await
    }

    pub fn licenses(&self) -> &[License] {
        self.licenses.items()
    }

    pub fn get(&self, id: EntityId) -> Option<&License> {
        self.licenses.get(id)
    }

    pub fn select(&mut self, id: EntityId) -> Option<&License> {
        self.licenses.select(id)
    }

    pub fn selected(&self) -> Option<&License> {
        self.licenses.selected()
    }

    pub fn status_label(&self, id: EntityId) -> Option<String> {
        self.licenses.get(id).map(|l| status_label(l, Utc::now()))
    }

    // ── Edit ──

    pub fn open_edit(&mut self, id: EntityId) -> Result<&mut LicenseEdit, SyncError> {
        let license = self.licenses.get(id).ok_or(SyncError::NotLoaded {
            entity: "license",
            id,
        })?;
        let form = LicenseEdit::from_license(license);
        Ok(&mut self.edit.insert((id, form)).1)
    }

    pub fn edit_mut(&mut self) -> Option<&mut LicenseEdit> {
        self.edit.as_mut().map(|(_, e)| e)
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Validate and save the open edit; closes it on success.
    pub async fn save_edit(&mut self) -> Result<License, SyncError> {
        let Some((id, form)) = self.edit.clone() else {
            return Err(SyncError::NothingOpen("license"));
        };
        let current = self.loaded(id, "save license")?;
        let stored = self.licenses.update(id, &form.apply_to(&current)).await?;
        self.edit = None;
        Ok(stored)
    }

    // ── Actions ──

    /// Replace the key with a fresh random one and record the audit.
    pub async fn regenerate_key(&mut self, id: EntityId) -> Result<License, SyncError> {
        let mut license = self.loaded(id, "regenerate key")?;
        license.license_key = generate_license_key(&mut rand::thread_rng());
        license.record_audit(AUDIT_REGENERATED, &now_rfc3339());
        self.licenses.update(id, &license).await
    }

    /// Set the status to revoked and record the audit. Refused for a
    /// license that is already revoked.
    pub async fn revoke(&mut self, id: EntityId) -> Result<License, SyncError> {
        let mut license = self.loaded(id, "revoke")?;
        if license.status == LicenseStatus::Revoked {
            return Err(report(
                &mut self.alerts,
                "revoke",
                SyncError::Refused(format!("License {} is already revoked.", id)),
            ));
        }
        license.status = LicenseStatus::Revoked;
        license.record_audit(AUDIT_REVOKED, &now_rfc3339());
        self.licenses.update(id, &license).await
    }

    pub async fn delete(&mut self, id: EntityId) -> Result<(), SyncError> {
        self.licenses.remove(id).await?;
        if self.edit.as_ref().is_some_and(|(eid, _)| *eid == id) {
            self.edit = None;
        }
        Ok(())
    }

    fn loaded(&mut self, id: EntityId, op: &str) -> Result<License, SyncError> {
        match self.licenses.get(id) {
            Some(l) => Ok(l.clone()),
            None => Err(report(
                &mut self.alerts,
                op,
                SyncError::NotLoaded { entity: "license", id },
            )),
        }
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        drain(&mut self.alerts, [self.licenses.take_alerts()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn license(status: LicenseStatus, end: &str) -> License {
        License {
            license_id: 1,
            status,
            end_date: end.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn expired_marker_ignores_status() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            status_label(&license(LicenseStatus::Active, "2024-12-31"), now),
            "active (Expired)"
        );
        assert_eq!(
            status_label(&license(LicenseStatus::Revoked, "2024-12-31"), now),
            "revoked (Expired)"
        );
        assert_eq!(
            status_label(&license(LicenseStatus::Active, "2030-01-01"), now),
            "active"
        );
        assert_eq!(status_label(&license(LicenseStatus::Expired, ""), now), "expired");
    }

    #[test]
    fn edit_keeps_audits() {
        let mut original = license(LicenseStatus::Active, "2030-01-01");
        original.record_audit("activated", "2024-01-01T00:00:00Z");
        let mut edit = LicenseEdit::from_license(&original);
        edit.license_key = "  NEWKEY01-23456789 ".into();
        edit.license_type = LicenseType::Perpetual;
        let applied = edit.apply_to(&original);
        assert_eq!(applied.license_key, "NEWKEY01-23456789");
        assert_eq!(applied.license_type, LicenseType::Perpetual);
        assert_eq!(applied.audits, original.audits);
        assert_eq!(applied.license_id, 1);
    }
}
