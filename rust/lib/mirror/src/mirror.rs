use std::sync::Arc;

use catalog_types::{EntityId, Resource};

/// What changed in a mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEvent {
    /// Contents replaced by a fresh load.
    Loaded { count: usize },
    /// Record added at the front.
    Inserted { id: EntityId },
    /// Record with this id replaced.
    Replaced { id: EntityId },
    /// Record with this id dropped.
    Removed { id: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Change callback. Receives the collection path and the event.
pub type ChangeHandler = Arc<dyn Fn(&str, &MirrorEvent) + Send + Sync>;

/// Ordered client-side copy of one remote collection.
///
/// Order is the server's order after a load; records created afterwards
/// are prepended. Ids are unique within the mirror.
pub struct Mirror<T: Resource> {
    items: Vec<T>,
    handlers: Vec<(SubscriptionId, ChangeHandler)>,
    next_id: u64,
}

impl<T: Resource> Default for Mirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> std::fmt::Debug for Mirror<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("path", &T::PATH)
            .field("len", &self.items.len())
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl<T: Resource> Mirror<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            handlers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Replace everything with a freshly fetched collection.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.notify(MirrorEvent::Loaded {
            count: self.items.len(),
        });
    }

    /// Put a newly created record at the front. A stale entry with the
    /// same id is dropped first.
    pub fn prepend(&mut self, item: T) {
        let id = item.id();
        self.items.retain(|x| x.id() != id);
        self.items.insert(0, item);
        self.notify(MirrorEvent::Inserted { id });
    }

    /// Replace the record with the same id, keeping its position.
    /// Returns false when no such record is mirrored.
    pub fn replace(&mut self, item: T) -> bool {
        let id = item.id();
        match self.items.iter_mut().find(|x| x.id() == id) {
            Some(slot) => {
                *slot = item;
                self.notify(MirrorEvent::Replaced { id });
                true
            }
            None => false,
        }
    }

    /// Modify one record in place, e.g. a list nested inside it.
    pub fn modify<R>(&mut self, id: EntityId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let slot = self.items.iter_mut().find(|x| x.id() == id)?;
        let out = f(slot);
        self.notify(MirrorEvent::Replaced { id });
        Some(out)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let pos = self.items.iter().position(|x| x.id() == id)?;
        let removed = self.items.remove(pos);
        self.notify(MirrorEvent::Removed { id });
        Some(removed)
    }

    /// Remove every record matching `pred`. Returns how many went.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let ids: Vec<EntityId> = self.items.iter().filter(|x| pred(x)).map(|x| x.id()).collect();
        for id in &ids {
            self.remove(*id);
        }
        ids.len()
    }

    /// Register a change handler. Handlers run synchronously after each
    /// mutation.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &MirrorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Arc::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    fn notify(&self, event: MirrorEvent) {
        for (_, handler) in &self.handlers {
            handler(T::PATH, &event);
        }
    }
}
