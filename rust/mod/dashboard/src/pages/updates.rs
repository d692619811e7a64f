use catalog::model::{Changelog, Product, Release};
use catalog_mirror::{Alert, Alerts, SyncError};
use catalog_types::{EntityId, RequiredFields, ValidationError};

use super::{drain, report, List};
use crate::view;
use crate::AppContext;

/// Product name shown for a release whose product is not loaded.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

const DEFAULT_STATUS: &str = "Planned";

/// Release form of the updates page. Events and infrastructure changes
/// are typed one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseForm {
    pub product_id: EntityId,
    pub version: String,
    pub title: String,
    pub status: String,
    pub release_date: String,
    pub download_url: String,
    /// Spotlight text, stored as the release notes.
    pub notes: String,
    pub events: String,
    pub infra: String,
}

impl Default for ReleaseForm {
    fn default() -> Self {
        Self {
            product_id: 0,
            version: String::new(),
            title: String::new(),
            status: DEFAULT_STATUS.to_string(),
            release_date: String::new(),
            download_url: String::new(),
            notes: String::new(),
            events: String::new(),
            infra: String::new(),
        }
    }
}

impl ReleaseForm {
    pub fn from_release(release: &Release) -> Self {
        let (events, infra) = release.changelog.to_texts();
        Self {
            product_id: release.product_id,
            version: release.version.clone(),
            title: release.title.clone().unwrap_or_default(),
            status: release.status.clone(),
            release_date: release.release_date.clone(),
            download_url: release.download_url.clone().unwrap_or_default(),
            notes: release.notes.clone().unwrap_or_default(),
            events,
            infra,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new("release")
            .text("version", &self.version)
            .text("title", &self.title)
            .id("productId", self.product_id)
            .finish()
    }

    /// `base` with the form applied. Nested records of `base` are kept.
    pub fn apply_to(&self, base: &Release) -> Release {
        let optional = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Release {
            product_id: self.product_id,
            version: self.version.trim().to_string(),
            title: optional(&self.title),
            status: self.status.trim().to_string(),
            release_date: self.release_date.trim().to_string(),
            download_url: optional(&self.download_url),
            notes: Some(self.notes.trim().to_string()),
            changelog: Changelog::from_texts(&self.events, &self.infra),
            ..base.clone()
        }
    }
}

/// Release feed with product names, plus create, edit and delete.
pub struct UpdatesPage {
    releases: List<Release>,
    products: List<Product>,
    form: Option<(Option<EntityId>, ReleaseForm)>,
    alerts: Alerts,
    pub search: String,
}

impl UpdatesPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            releases: List::new(ctx.api().releases()),
            products: List::new(ctx.api().products()),
            form: None,
            alerts: Alerts::default(),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.releases.load().await?;
        self.products.load().await?;
        Ok(())
    }

    pub fn product_name(&self, product_id: EntityId) -> &str {
        self.products
            .get(product_id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PRODUCT)
    }

    /// Mirrored releases with their product names filled in, filtered by
    /// the search box.
    pub fn feed(&self) -> Vec<Release> {
        let named: Vec<Release> = self
            .releases
            .items()
            .iter()
            .map(|r| Release {
                product_name: Some(self.product_name(r.product_id).to_string()),
                ..r.clone()
            })
            .collect();
        view::search(&named, &self.search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn select(&mut self, id: EntityId) -> Option<&Release> {
        self.releases.select(id)
    }

    pub fn selected(&self) -> Option<&Release> {
        self.releases.selected()
    }

    // ── Form ──

    pub fn open_new(&mut self) -> &mut ReleaseForm {
        &mut self.form.insert((None, ReleaseForm::default())).1
    }

    pub fn open_edit(&mut self, id: EntityId) -> Result<&mut ReleaseForm, SyncError> {
        let release = self.releases.get(id).ok_or(SyncError::NotLoaded {
            entity: "release",
            id,
        })?;
        let form = ReleaseForm::from_release(release);
        Ok(&mut self.form.insert((Some(id), form)).1)
    }

    pub fn form_mut(&mut self) -> Option<&mut ReleaseForm> {
        self.form.as_mut().map(|(_, f)| f)
    }

    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Save the open form. Version, title and product are required.
    pub async fn save(&mut self) -> Result<Release, SyncError> {
        let Some((editing, form)) = self.form.clone() else {
            return Err(SyncError::NothingOpen("release"));
        };
        if let Err(e) = form.validate() {
            return Err(report(&mut self.alerts, "save release", e.into()));
        }
        let stored = match editing {
            None => {
                let release = form.apply_to(&Release::default());
                self.releases.create(&release).await?
            }
            Some(id) => {
                let Some(base) = self.releases.get(id).cloned() else {
                    return Err(report(
                        &mut self.alerts,
                        "save release",
                        SyncError::NotLoaded { entity: "release", id },
                    ));
                };
                self.releases.update(id, &form.apply_to(&base)).await?
            }
        };
        self.form = None;
        Ok(stored)
    }

    /// Delete a release; the form and detail showing it close.
    pub async fn delete(&mut self, id: EntityId) -> Result<(), SyncError> {
        self.releases.remove(id).await?;
        if matches!(self.form, Some((Some(eid), _)) if eid == id) {
            self.form = None;
        }
        Ok(())
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        drain(
            &mut self.alerts,
            [self.releases.take_alerts(), self.products.take_alerts()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::model::ChangeCategory;

    #[test]
    fn form_requires_version_title_product() {
        let err = ReleaseForm::default().validate().unwrap_err();
        assert_eq!(err.missing, vec!["version", "title", "productId"]);

        let form = ReleaseForm {
            product_id: 2,
            version: "2.1".into(),
            title: "Spring".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn changelog_from_text_areas() {
        let form = ReleaseForm {
            product_id: 1,
            version: "2.0".into(),
            title: "Big".into(),
            events: "Launch party\n\n  Webinar  ".into(),
            infra: "New cluster".into(),
            notes: " Spotlight ".into(),
            ..Default::default()
        };
        let release = form.apply_to(&Release::default());
        assert_eq!(release.changelog.events(), vec!["Launch party", "Webinar"]);
        assert_eq!(release.changelog.infra(), vec!["New cluster"]);
        assert_eq!(release.changelog.entries()[2].category, ChangeCategory::Infra);
        assert_eq!(release.notes.as_deref(), Some("Spotlight"));
        assert_eq!(release.status, "Planned");

        let back = ReleaseForm::from_release(&release);
        assert_eq!(back.events, "Launch party\nWebinar");
        assert_eq!(back.infra, "New cluster");
    }
}
