use catalog_core::{next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::{files, CatalogService};
use crate::model::{Artifact, Release, ReleaseDependency, UpdateLog};

/// Title shown in the updates feed for releases saved without one.
pub const UNTITLED_RELEASE: &str = "(No Title Provided)";
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Insert `item`, or replace the element with the same key.
fn upsert<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let k = key(&item);
    match items.iter_mut().find(|x| key(x) == k) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Next free ids for rows nested in releases. Nested ids are unique
/// across the whole catalog, not just within one release.
pub(crate) struct NestedIds {
    pub artifact: i64,
    pub update_log: i64,
    pub dependency: i64,
}

impl NestedIds {
    pub(crate) fn next(releases: &[Release]) -> Self {
        Self {
            artifact: next_id(
                releases
                    .iter()
                    .flat_map(|r| r.artifacts.iter().map(|a| a.artifact_id)),
            ),
            update_log: next_id(
                releases
                    .iter()
                    .flat_map(|r| r.update_logs.iter().map(|l| l.update_log_id)),
            ),
            dependency: next_id(
                releases
                    .iter()
                    .flat_map(|r| r.dependencies.iter().map(|d| d.release_dependency_id)),
            ),
        }
    }
}

impl CatalogService {
    pub async fn list_releases(&self) -> Vec<Release> {
        self.state.read().await.releases.clone()
    }

    pub async fn get_release(&self, id: i64) -> Result<Release, ServiceError> {
        self.state
            .read()
            .await
            .releases
            .iter()
            .find(|r| r.release_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Release"))
    }

    /// Create or replace a release, keyed by `releaseId`. A zero id gets a
    /// fresh one.
    pub async fn save_release(&self, mut release: Release) -> Result<Release, ServiceError> {
        let release = self
            .commit(&[files::RELEASES], |state| {
                if release.release_id <= 0 {
                    release.release_id = next_id(state.releases.iter().map(|r| r.release_id));
                }
                release.last_modified = Some(now_rfc3339());
                upsert(&mut state.releases, release.clone(), |r| r.release_id);
                Ok(release)
            })
            .await?;

        info!(id = release.release_id, version = %release.version, "Release saved");
        Ok(release)
    }

    /// Replace an existing release.
    pub async fn replace_release(&self, id: i64, mut release: Release) -> Result<Release, ServiceError> {
        self.commit(&[files::RELEASES], |state| {
            let slot = state
                .releases
                .iter_mut()
                .find(|r| r.release_id == id)
                .ok_or_else(|| ServiceError::not_found("Release"))?;

            release.release_id = id;
            release.last_modified = Some(now_rfc3339());
            *slot = release.clone();
            Ok(release)
        })
        .await
    }

    pub async fn delete_release(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::RELEASES], |state| {
            let before = state.releases.len();
            state.releases.retain(|r| r.release_id != id);
            if state.releases.len() == before {
                return Err(ServiceError::not_found("Release"));
            }
            Ok(())
        })
        .await?;
        info!(id, "Release deleted");
        Ok(())
    }

    /// Run `f` on one release, then stamp and persist it.
    async fn with_release<R>(
        &self,
        id: i64,
        f: impl FnOnce(&mut Release, NestedIds) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        self.commit(&[files::RELEASES], |state| {
            let ids = NestedIds::next(&state.releases);
            let release = state
                .releases
                .iter_mut()
                .find(|r| r.release_id == id)
                .ok_or_else(|| ServiceError::not_found("Release"))?;

            let out = f(release, ids)?;
            release.last_modified = Some(now_rfc3339());
            Ok(out)
        })
        .await
    }

    // ── Artifacts ──

    pub async fn save_artifact(
        &self,
        release_id: i64,
        mut artifact: Artifact,
    ) -> Result<Artifact, ServiceError> {
        self.with_release(release_id, |release, ids| {
            if artifact.artifact_id <= 0 {
                artifact.artifact_id = ids.artifact;
            }
            artifact.release_id = release_id;
            if artifact.created_at.is_none() {
                artifact.created_at = Some(now_rfc3339());
            }
            upsert(&mut release.artifacts, artifact.clone(), |a| a.artifact_id);
            Ok(artifact)
        })
        .await
    }

    pub async fn delete_artifact(&self, release_id: i64, artifact_id: i64) -> Result<(), ServiceError> {
        self.with_release(release_id, |release, _| {
            let before = release.artifacts.len();
            release.artifacts.retain(|a| a.artifact_id != artifact_id);
            if release.artifacts.len() == before {
                return Err(ServiceError::not_found("Artifact"));
            }
            Ok(())
        })
        .await
    }

    // ── Update logs ──

    pub async fn save_update_log(
        &self,
        release_id: i64,
        mut log: UpdateLog,
    ) -> Result<UpdateLog, ServiceError> {
        self.with_release(release_id, |release, ids| {
            if log.update_log_id <= 0 {
                log.update_log_id = ids.update_log;
            }
            log.release_id = release_id;
            upsert(&mut release.update_logs, log.clone(), |l| l.update_log_id);
            Ok(log)
        })
        .await
    }

    pub async fn delete_update_log(&self, release_id: i64, log_id: i64) -> Result<(), ServiceError> {
        self.with_release(release_id, |release, _| {
            let before = release.update_logs.len();
            release.update_logs.retain(|l| l.update_log_id != log_id);
            if release.update_logs.len() == before {
                return Err(ServiceError::not_found("Update log"));
            }
            Ok(())
        })
        .await
    }

    // ── Dependencies ──

    pub async fn save_dependency(
        &self,
        release_id: i64,
        mut dep: ReleaseDependency,
    ) -> Result<ReleaseDependency, ServiceError> {
        self.with_release(release_id, |release, ids| {
            if dep.release_dependency_id <= 0 {
                dep.release_dependency_id = ids.dependency;
            }
            dep.release_id = release_id;
            upsert(&mut release.dependencies, dep.clone(), |d| d.release_dependency_id);
            Ok(dep)
        })
        .await
    }

    pub async fn delete_dependency(&self, release_id: i64, dep_id: i64) -> Result<(), ServiceError> {
        self.with_release(release_id, |release, _| {
            let before = release.dependencies.len();
            release.dependencies.retain(|d| d.release_dependency_id != dep_id);
            if release.dependencies.len() == before {
                return Err(ServiceError::not_found("Dependency"));
            }
            Ok(())
        })
        .await
    }

    // ── Updates feed ──

    /// Every release with its product name filled in, newest first.
    /// Missing titles and notes are given placeholder values.
    pub async fn list_updates(&self) -> Vec<Release> {
        let state = self.state.read().await;
        let mut feed: Vec<Release> = state
            .releases
            .iter()
            .map(|r| {
                let mut r = r.clone();
                let name = state
                    .products
                    .iter()
                    .find(|p| p.product_id == r.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
                r.product_name = Some(name);
                r.title.get_or_insert_with(|| UNTITLED_RELEASE.to_string());
                r.notes.get_or_insert_with(String::new);
                r
            })
            .collect();
        feed.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        feed
    }
}
