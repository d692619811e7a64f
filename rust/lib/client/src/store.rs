use async_trait::async_trait;
use catalog_types::{EntityId, Resource};

use crate::ApiError;

/// The four calls a synchronized list makes against its collection.
///
/// [`ResourceClient`](crate::ResourceClient) is the HTTP implementation;
/// tests substitute in-memory stores.
#[async_trait]
pub trait RemoteStore<T: Resource>: Send + Sync {
    /// Entire collection, in server order.
    async fn list(&self) -> Result<Vec<T>, ApiError>;

    /// Create; returns the stored record.
    async fn create(&self, item: &T) -> Result<T, ApiError>;

    /// Update; returns the stored record.
    async fn update(&self, id: EntityId, item: &T) -> Result<T, ApiError>;

    async fn remove(&self, id: EntityId) -> Result<(), ApiError>;
}
