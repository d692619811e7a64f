//! In-memory fixtures shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_client::{ApiError, RemoteStore};
use catalog_types::{EntityId, RequiredFields, Resource, Validate, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: EntityId,
    pub name: String,
    /// Bumped by the store on every write.
    pub revision: u32,
}

impl Widget {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            revision: 0,
        }
    }
}

impl Resource for Widget {
    const NAME: &'static str = "widget";
    const PATH: &'static str = "widgets";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Validate for Widget {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME).text("name", &self.name).finish()
    }
}

/// Store that trims names and bumps revisions, so responses differ from
/// what was sent.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<Widget>>,
    pub calls: AtomicU32,
    pub failing: AtomicBool,
}

impl FakeStore {
    pub fn with(rows: Vec<Widget>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Http { status: 500 });
        }
        Ok(())
    }

    fn stamp(item: &Widget, id: EntityId) -> Widget {
        Widget {
            id,
            name: item.name.trim().to_string(),
            revision: item.revision + 1,
        }
    }
}

#[async_trait]
impl RemoteStore<Widget> for FakeStore {
    async fn list(&self) -> Result<Vec<Widget>, ApiError> {
        self.enter()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, item: &Widget) -> Result<Widget, ApiError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let stored = Self::stamp(item, id);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: EntityId, item: &Widget) -> Result<Widget, ApiError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(ApiError::Http { status: 404 })?;
        *slot = Self::stamp(item, id);
        Ok(slot.clone())
    }

    async fn remove(&self, id: EntityId) -> Result<(), ApiError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|w| w.id != id);
        if rows.len() == before {
            return Err(ApiError::Http { status: 404 });
        }
        Ok(())
    }
}
