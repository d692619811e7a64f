use catalog_client::RemoteStore;
use catalog_types::{EntityId, Resource, Validate};
use tracing::{debug, warn};

use crate::{Alerts, EditBuffer, EditMode, Mirror, SyncError};

/// One synchronized entity list: remote store, local mirror, detail
/// selection and edit buffer.
///
/// Every mutation goes to the server first. Only a successful response
/// touches the mirror, and the record the server returned replaces
/// whatever the user typed. On failure the mirror stays as it was, an
/// error alert is queued and the edit buffer is left open.
///
/// Operations take `&mut self`, so they complete in call order and the
/// last response applied is the one the mirror shows.
pub struct EntityList<T: Resource, S> {
    store: S,
    mirror: Mirror<T>,
    buffer: EditBuffer<T>,
    selected: Option<EntityId>,
    alerts: Alerts,
    loaded: bool,
}

impl<T, S> std::fmt::Debug for EntityList<T, S>
where
    T: Resource + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityList")
            .field("mirror", &self.mirror)
            .field("mode", &self.buffer.mode())
            .field("selected", &self.selected)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl<T, S> EntityList<T, S>
where
    T: Resource + Default,
    S: RemoteStore<T>,
{
    /// List whose edit buffer resets to `T::default()`.
    pub fn new(store: S) -> Self {
        Self::with_template(store, T::default())
    }
}

impl<T, S> EntityList<T, S>
where
    T: Resource,
    S: RemoteStore<T>,
{
    pub fn with_template(store: S, template: T) -> Self {
        Self {
            store,
            mirror: Mirror::new(),
            buffer: EditBuffer::new(template),
            selected: None,
            alerts: Alerts::default(),
            loaded: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mirror(&self) -> &Mirror<T> {
        &self.mirror
    }

    /// Direct access for change subscriptions and nested-record updates.
    pub fn mirror_mut(&mut self) -> &mut Mirror<T> {
        &mut self.mirror
    }

    pub fn items(&self) -> &[T] {
        self.mirror.items()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.mirror.get(id)
    }

    /// Whether a load has succeeded at least once.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the collection and replace the mirror with it.
    pub async fn load(&mut self) -> Result<usize, SyncError> {
        match self.store.list().await {
            Ok(items) => {
                debug!(path = T::PATH, count = items.len(), "loaded");
                self.mirror.replace_all(items);
                self.loaded = true;
                if let Some(id) = self.selected {
                    if !self.mirror.contains(id) {
                        self.clear_selection();
                    }
                }
                Ok(self.mirror.len())
            }
            Err(e) => Err(self.fail("load", e.into())),
        }
    }

    /// Delete on the server, then drop the record locally. A detail view
    /// or edit buffer showing it is closed.
    pub async fn remove(&mut self, id: EntityId) -> Result<(), SyncError> {
        if let Err(e) = self.store.remove(id).await {
            return Err(self.fail("delete", e.into()));
        }
        self.apply_removed(id);
        self.alerts.info(format!("Deleted {} {}.", T::NAME, id));
        Ok(())
    }

    /// Record the server's answer to a create made elsewhere.
    pub fn apply_created(&mut self, stored: T) {
        self.mirror.prepend(stored);
    }

    /// Record the server's answer to an update made elsewhere. Records
    /// not yet mirrored are prepended.
    pub fn apply_updated(&mut self, stored: T) {
        if !self.mirror.replace(stored.clone()) {
            self.mirror.prepend(stored);
        }
    }

    /// Record a deletion made elsewhere.
    pub fn apply_removed(&mut self, id: EntityId) {
        self.mirror.remove(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.buffer.editing_id() == Some(id) {
            self.buffer.close();
        }
    }

    // ── Selection ──

    /// Show one mirrored record in the detail view.
    pub fn select(&mut self, id: EntityId) -> Option<&T> {
        if !self.mirror.contains(id) {
            return None;
        }
        self.selected = Some(id);
        self.mirror.get(id)
    }

    /// The selected record as currently mirrored.
    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|id| self.mirror.get(id))
    }

    pub fn selected_id(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ── Edit buffer ──

    pub fn buffer(&self) -> &EditBuffer<T> {
        &self.buffer
    }

    pub fn open_new(&mut self) -> &mut T {
        self.buffer.open_new()
    }

    /// Open the edit buffer on a copy of a mirrored record.
    pub fn open_edit(&mut self, id: EntityId) -> Result<&mut T, SyncError> {
        let item = self.mirror.get(id).ok_or(SyncError::NotLoaded {
            entity: T::NAME,
            id,
        })?;
        Ok(self.buffer.open_edit(item))
    }

    /// The open buffer's value, for the form to write into.
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        if self.buffer.is_open() {
            Some(self.buffer.value_mut())
        } else {
            None
        }
    }

    /// Discard the buffer.
    pub fn cancel_edit(&mut self) {
        self.buffer.close();
    }

    // ── Alerts ──

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<crate::Alert> {
        self.alerts.take()
    }

    fn fail(&mut self, op: &str, err: SyncError) -> SyncError {
        warn!(path = T::PATH, op, error = %err, "sync failed");
        self.alerts.error(err.user_message());
        err
    }
}

impl<T, S> EntityList<T, S>
where
    T: Resource + Validate,
    S: RemoteStore<T>,
{
    /// Validate, create on the server, prepend the stored record.
    pub async fn create(&mut self, item: &T) -> Result<T, SyncError> {
        if let Err(e) = item.validate() {
            return Err(self.fail("create", e.into()));
        }
        let stored = match self.store.create(item).await {
            Ok(stored) => stored,
            Err(e) => return Err(self.fail("create", e.into())),
        };
        debug!(path = T::PATH, id = stored.id(), "created");
        self.apply_created(stored.clone());
        self.alerts.info(format!("Created {} {}.", T::NAME, stored.id()));
        Ok(stored)
    }

    /// Validate, update on the server, replace the mirrored record with
    /// the stored one.
    pub async fn update(&mut self, id: EntityId, item: &T) -> Result<T, SyncError> {
        if let Err(e) = item.validate() {
            return Err(self.fail("update", e.into()));
        }
        let stored = match self.store.update(id, item).await {
            Ok(stored) => stored,
            Err(e) => return Err(self.fail("update", e.into())),
        };
        debug!(path = T::PATH, id, "updated");
        self.apply_updated(stored.clone());
        self.alerts.info(format!("Saved {} {}.", T::NAME, id));
        Ok(stored)
    }

    /// Submit the edit buffer: create when it was opened empty, update
    /// when it was opened on a record. Closes the buffer on success only.
    pub async fn save_buffer(&mut self) -> Result<T, SyncError> {
        let draft = self.buffer.value().clone();
        let stored = match self.buffer.mode() {
            EditMode::Closed => return Err(SyncError::NothingOpen(T::NAME)),
            EditMode::Creating => self.create(&draft).await?,
            EditMode::Editing(id) => self.update(id, &draft).await?,
        };
        self.buffer.close();
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStore, Widget};
    use crate::AlertLevel;

    async fn loaded(rows: Vec<Widget>) -> EntityList<Widget, FakeStore> {
        let mut list = EntityList::new(FakeStore::with(rows));
        list.load().await.unwrap();
        list
    }

    #[tokio::test]
    async fn load_mirrors_server_order() {
        let list = loaded(vec![Widget::new(2, "b"), Widget::new(1, "a")]).await;
        assert!(list.is_loaded());
        let ids: Vec<_> = list.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn create_prepends_the_server_record() {
        let mut list = loaded(vec![Widget::new(1, "a")]).await;
        list.open_new().name = "  spaced  ".into();
        let stored = list.save_buffer().await.unwrap();

        assert_eq!(stored.id, 2);
        assert_eq!(list.items()[0].name, "spaced");
        assert_eq!(list.items()[0].revision, 1);
        assert!(!list.buffer().is_open());
        assert_eq!(list.buffer().value().name, "");
    }

    #[tokio::test]
    async fn update_keeps_position_and_server_wins() {
        let mut list = loaded(vec![Widget::new(1, "a"), Widget::new(2, "b")]).await;
        list.open_edit(2).unwrap().name = " B ".into();
        list.save_buffer().await.unwrap();

        assert_eq!(list.items()[1], Widget { id: 2, name: "B".into(), revision: 1 });
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let mut list = loaded(vec![]).await;
        let calls = list.store().calls();
        list.open_new();
        let err = list.save_buffer().await.unwrap_err();

        assert!(matches!(err, SyncError::Validation(_)));
        assert_eq!(list.store().calls(), calls);
        assert!(list.buffer().is_open());
        let alerts = list.take_alerts();
        assert_eq!(alerts[0].level, AlertLevel::Error);
        assert!(alerts[0].message.contains("name"));
    }

    #[tokio::test]
    async fn last_applied_response_wins() {
        let mut list = loaded(vec![Widget::new(1, "a"), Widget::new(2, "b")]).await;
        let first = Widget { id: 2, name: "first".into(), revision: 1 };
        let second = Widget { id: 2, name: "second".into(), revision: 2 };

        list.apply_updated(second);
        list.apply_updated(first.clone());

        let matching: Vec<_> = list.items().iter().filter(|w| w.id == 2).collect();
        assert_eq!(matching, vec![&first]);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[1], first);
    }

    #[tokio::test]
    async fn update_of_unmirrored_record_prepends_it() {
        let mut list = loaded(vec![Widget::new(1, "a")]).await;
        let stray = Widget { id: 9, name: "stray".into(), revision: 3 };

        list.apply_updated(stray.clone());
        assert_eq!(list.items(), &[stray.clone(), Widget::new(1, "a")][..]);

        list.apply_updated(Widget { revision: 4, ..stray });
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[0].revision, 4);
    }

    #[tokio::test]
    async fn remote_failure_leaves_mirror_unchanged() {
        let mut list = loaded(vec![Widget::new(1, "a")]).await;
        list.store().fail(true);

        list.open_edit(1).unwrap().name = "changed".into();
        assert!(matches!(list.save_buffer().await, Err(SyncError::Remote(_))));
        assert_eq!(list.items()[0].name, "a");
        assert_eq!(list.buffer().value().name, "changed");

        assert!(list.remove(1).await.is_err());
        assert_eq!(list.items().len(), 1);

        assert!(list.load().await.is_err());
        assert_eq!(list.items().len(), 1);
        assert!(list.alerts().pending().iter().all(|a| a.is_error()));
    }

    #[tokio::test]
    async fn delete_closes_detail_and_buffer() {
        let mut list = loaded(vec![Widget::new(1, "a"), Widget::new(2, "b")]).await;
        list.select(1).unwrap();
        list.open_edit(1).unwrap();

        list.remove(1).await.unwrap();
        assert!(list.selected().is_none());
        assert!(!list.buffer().is_open());
        assert_eq!(list.items().len(), 1);
    }

    #[tokio::test]
    async fn selection_follows_server_updates() {
        let mut list = loaded(vec![Widget::new(1, "a")]).await;
        list.select(1);
        list.update(1, &Widget::new(1, "first")).await.unwrap();
        list.update(1, &Widget::new(1, "second")).await.unwrap();
        assert_eq!(list.selected().unwrap().name, "second");
        assert!(list.select(99).is_none());
    }

    #[tokio::test]
    async fn save_without_buffer_is_an_error() {
        let mut list = loaded(vec![]).await;
        assert!(matches!(
            list.save_buffer().await,
            Err(SyncError::NothingOpen("widget"))
        ));
        assert!(matches!(
            list.open_edit(5),
            Err(SyncError::NotLoaded { id: 5, .. })
        ));
    }
}
