//! HTTP client for the catalog REST API.
//!
//! [`CatalogApi`] hands out one [`ResourceClient`] per collection plus the
//! settings, updates and assignment calls that do not fit the CRUD shape.
//! [`RemoteStore`] is the seam the local mirror synchronizes through.
//!
//! Any non-2xx status is a failure ([`ApiError::Http`]); bodies of failed
//! responses are not read. Calls are attempted once unless a
//! [`RetryPolicy`] says otherwise.

mod api;
mod error;
mod resource;
mod retry;
mod store;
mod transport;

pub use api::{CatalogApi, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use resource::{ResourceClient, UpdateVerb};
pub use retry::RetryPolicy;
pub use store::RemoteStore;
pub use transport::IDEMPOTENCY_KEY;
