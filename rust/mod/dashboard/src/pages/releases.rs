use catalog::model::{
    Artifact, Product, Release, ReleaseDependency, ReleaseType, UpdateLog,
};
use catalog_client::CatalogApi;
use catalog_mirror::{Alert, Alerts, SyncError};
use catalog_types::{now_rfc3339, EntityId};
use tracing::debug;

use super::{drain, report, List};
use crate::view::{self, ReleasesByProduct};
use crate::AppContext;

/// Version given to drafts added from this page.
pub const DRAFT_VERSION: &str = "1.0.0";

/// Products with their releases, and the artifacts, update logs and
/// dependencies of the selected product.
///
/// Nested records are attached to the product's latest release. When the
/// product has none, a draft release is created first; the two calls are
/// independent and nothing is rolled back if the second fails.
pub struct ReleasesPage {
    api: CatalogApi,
    products: List<Product>,
    releases: List<Release>,
    alerts: Alerts,
}

impl ReleasesPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api().clone(),
            products: List::new(ctx.api().products()),
            releases: List::new(ctx.api().releases()),
            alerts: Alerts::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.products.load().await?;
        self.releases.load().await?;
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        self.products.items()
    }

    pub fn releases(&self) -> &[Release] {
        self.releases.items()
    }

    pub fn groups(&self) -> ReleasesByProduct {
        view::group_releases(self.releases.items())
    }

    /// Releases of one product, newest first.
    pub fn releases_for(&self, product_id: EntityId) -> Vec<Release> {
        self.groups().remove(&product_id).unwrap_or_default()
    }

    pub fn latest_for(&self, product_id: EntityId) -> Option<Release> {
        self.releases_for(product_id).into_iter().next()
    }

    // ── Product detail ──

    pub fn select_product(&mut self, ctx: &mut AppContext, id: EntityId) -> Option<&Product> {
        if self.products.mirror().contains(id) {
            ctx.open_product(id);
        }
        self.products.select(id)
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.selected()
    }

    /// Close the detail panel and any open product form.
    pub fn close_product(&mut self) {
        self.products.clear_selection();
        self.products.cancel_edit();
    }

    pub fn edit_product(&mut self, id: EntityId) -> Result<&mut Product, SyncError> {
        self.products.open_edit(id)
    }

    pub fn product_draft_mut(&mut self) -> Option<&mut Product> {
        self.products.draft_mut()
    }

    pub async fn save_product(&mut self) -> Result<Product, SyncError> {
        self.products.save_buffer().await
    }

    /// Delete a product and drop its release group from the page. The
    /// releases themselves stay on the server.
    pub async fn delete_product(&mut self, ctx: &mut AppContext, id: EntityId) -> Result<(), SyncError> {
        self.products.remove(id).await?;
        let dropped = self
            .releases
            .mirror_mut()
            .remove_where(|r| r.product_id == id);
        debug!(product_id = id, dropped, "release group dropped");
        if ctx.selected_product() == Some(id) {
            ctx.clear_product();
        }
        Ok(())
    }

    // ── Releases ──

    fn selected_id(&mut self, op: &str) -> Result<EntityId, SyncError> {
        match self.products.selected_id() {
            Some(id) => Ok(id),
            None => Err(report(&mut self.alerts, op, SyncError::NothingOpen("product"))),
        }
    }

    /// Add a draft release to the selected product.
    pub async fn add_release(&mut self) -> Result<Release, SyncError> {
        let product_id = self.selected_id("add release")?;
        let mut draft = Release::draft(product_id, DRAFT_VERSION, &now_rfc3339());
        draft.release_type = ReleaseType::Minor;
        draft.notes = Some(String::new());
        self.releases.create(&draft).await
    }

    pub async fn delete_release(&mut self, release_id: EntityId) -> Result<(), SyncError> {
        self.releases.remove(release_id).await
    }

    /// Latest release of the selected product, creating a draft when
    /// there is none.
    async fn target_release(&mut self, op: &str) -> Result<EntityId, SyncError> {
        let product_id = self.selected_id(op)?;
        if let Some(latest) = self.latest_for(product_id) {
            return Ok(latest.release_id);
        }
        Ok(self.add_release().await?.release_id)
    }

    /// Release of the selected product holding the matching nested row.
    fn owner_of(&self, pred: impl Fn(&Release) -> bool) -> Option<EntityId> {
        let product_id = self.products.selected_id()?;
        self.releases
            .items()
            .iter()
            .filter(|r| r.product_id == product_id)
            .find(|r| pred(r))
            .map(|r| r.release_id)
    }

    // ── Artifacts ──

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.selected_rows(|rels| view::artifacts_of(rels).into_iter().cloned().collect())
    }

    pub async fn add_artifact(&mut self, mut artifact: Artifact) -> Result<Artifact, SyncError> {
        let release_id = self.target_release("add artifact").await?;
        artifact.release_id = release_id;
        let stored = match self.api.artifacts(release_id).create(&artifact).await {
            Ok(stored) => stored,
            Err(e) => return Err(report(&mut self.alerts, "add artifact", e.into())),
        };
        let row = stored.clone();
        self.releases.mirror_mut().modify(release_id, move |r| {
            r.artifacts.retain(|a| a.artifact_id != row.artifact_id);
            r.artifacts.push(row);
        });
        Ok(stored)
    }

    pub async fn remove_artifact(&mut self, artifact_id: EntityId) -> Result<(), SyncError> {
        let Some(release_id) =
            self.owner_of(|r| r.artifacts.iter().any(|a| a.artifact_id == artifact_id))
        else {
            return Err(SyncError::NotLoaded { entity: "artifact", id: artifact_id });
        };
        if let Err(e) = self.api.artifacts(release_id).remove(artifact_id).await {
            return Err(report(&mut self.alerts, "remove artifact", e.into()));
        }
        self.releases.mirror_mut().modify(release_id, |r| {
            r.artifacts.retain(|a| a.artifact_id != artifact_id)
        });
        Ok(())
    }

    // ── Update logs ──

    pub fn update_logs(&self) -> Vec<UpdateLog> {
        self.selected_rows(|rels| view::update_logs_of(rels).into_iter().cloned().collect())
    }

    pub async fn add_update_log(&mut self, mut log: UpdateLog) -> Result<UpdateLog, SyncError> {
        let release_id = self.target_release("add update log").await?;
        log.release_id = release_id;
        if log.product_id.is_none() {
            log.product_id = self.products.selected_id();
        }
        let stored = match self.api.update_logs(release_id).create(&log).await {
            Ok(stored) => stored,
            Err(e) => return Err(report(&mut self.alerts, "add update log", e.into())),
        };
        let row = stored.clone();
        self.releases.mirror_mut().modify(release_id, move |r| {
            r.update_logs.retain(|l| l.update_log_id != row.update_log_id);
            r.update_logs.push(row);
        });
        Ok(stored)
    }

    pub async fn remove_update_log(&mut self, update_log_id: EntityId) -> Result<(), SyncError> {
        let Some(release_id) =
            self.owner_of(|r| r.update_logs.iter().any(|l| l.update_log_id == update_log_id))
        else {
            return Err(SyncError::NotLoaded { entity: "update log", id: update_log_id });
        };
        if let Err(e) = self.api.update_logs(release_id).remove(update_log_id).await {
            return Err(report(&mut self.alerts, "remove update log", e.into()));
        }
        self.releases.mirror_mut().modify(release_id, |r| {
            r.update_logs.retain(|l| l.update_log_id != update_log_id)
        });
        Ok(())
    }

    // ── Dependencies ──

    pub fn dependencies(&self) -> Vec<ReleaseDependency> {
        self.selected_rows(|rels| view::dependencies_of(rels).into_iter().cloned().collect())
    }

    pub async fn add_dependency(
        &mut self,
        mut dep: ReleaseDependency,
    ) -> Result<ReleaseDependency, SyncError> {
        let release_id = self.target_release("add dependency").await?;
        dep.release_id = release_id;
        let stored = match self.api.dependencies(release_id).create(&dep).await {
            Ok(stored) => stored,
            Err(e) => return Err(report(&mut self.alerts, "add dependency", e.into())),
        };
        let row = stored.clone();
        self.releases.mirror_mut().modify(release_id, move |r| {
            r.dependencies
                .retain(|d| d.release_dependency_id != row.release_dependency_id);
            r.dependencies.push(row);
        });
        Ok(stored)
    }

    pub async fn remove_dependency(&mut self, dep_id: EntityId) -> Result<(), SyncError> {
        let Some(release_id) = self.owner_of(|r| {
            r.dependencies
                .iter()
                .any(|d| d.release_dependency_id == dep_id)
        }) else {
            return Err(SyncError::NotLoaded { entity: "dependency", id: dep_id });
        };
        if let Err(e) = self.api.dependencies(release_id).remove(dep_id).await {
            return Err(report(&mut self.alerts, "remove dependency", e.into()));
        }
        self.releases.mirror_mut().modify(release_id, |r| {
            r.dependencies.retain(|d| d.release_dependency_id != dep_id)
        });
        Ok(())
    }

    fn selected_rows<R>(&self, f: impl FnOnce(&[Release]) -> Vec<R>) -> Vec<R> {
        match self.products.selected_id() {
            Some(id) => f(&self.releases_for(id)),
            None => Vec::new(),
        }
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        drain(
            &mut self.alerts,
            [self.products.take_alerts(), self.releases.take_alerts()],
        )
    }
}
