use catalog_core::{next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::{files, CatalogService};
use crate::model::License;

impl CatalogService {
    pub async fn list_licenses(&self) -> Vec<License> {
        self.state.read().await.licenses.clone()
    }

    pub async fn get_license(&self, id: i64) -> Result<License, ServiceError> {
        self.state
            .read()
            .await
            .licenses
            .iter()
            .find(|l| l.license_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("License"))
    }

    pub async fn create_license(&self, mut license: License) -> Result<License, ServiceError> {
        let license = self
            .commit(&[files::LICENSES], |state| {
                license.license_id = next_id(state.licenses.iter().map(|l| l.license_id));
                license.last_modified = Some(now_rfc3339());
                state.licenses.push(license.clone());
                Ok(license)
            })
            .await?;

        info!(id = license.license_id, client = license.client_id, "License created");
        Ok(license)
    }

    pub async fn replace_license(&self, id: i64, mut license: License) -> Result<License, ServiceError> {
        let license = self
            .commit(&[files::LICENSES], |state| {
                let slot = state
                    .licenses
                    .iter_mut()
                    .find(|l| l.license_id == id)
                    .ok_or_else(|| ServiceError::not_found("License"))?;

                license.license_id = id;
                license.last_modified = Some(now_rfc3339());
                *slot = license.clone();
                Ok(license)
            })
            .await?;

        info!(id, status = license.status.as_str(), "License updated");
        Ok(license)
    }

    pub async fn delete_license(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::LICENSES], |state| {
            let before = state.licenses.len();
            state.licenses.retain(|l| l.license_id != id);
            if state.licenses.len() == before {
                return Err(ServiceError::not_found("License"));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LicenseStatus;

    #[tokio::test]
    async fn test_license_lifecycle() {
        let svc = CatalogService::in_memory();
        let l = svc
            .create_license(License {
                client_id: 1,
                product_id: 2,
                license_key: "ABCDEFGH-IJKLMNOP".into(),
                end_date: "2030-01-01".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(l.license_id, 1);

        let mut revoked = l.clone();
        revoked.status = LicenseStatus::Revoked;
        revoked.license_id = 500;
        let saved = svc.replace_license(1, revoked).await.unwrap();
        assert_eq!(saved.license_id, 1);
        assert_eq!(svc.get_license(1).await.unwrap().status, LicenseStatus::Revoked);

        svc.delete_license(1).await.unwrap();
        assert_eq!(
            svc.delete_license(1).await.unwrap_err().to_string(),
            "License not found"
        );
    }
}
