//! Catalog domain: the product, release, client, license and settings
//! records shared by every front end, plus the server-side service and
//! axum API that `catalogd` mounts at `/api` (feature `server`).

pub mod model;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod service;

#[cfg(feature = "server")]
pub use api::{router, CatalogModule};
#[cfg(feature = "server")]
pub use service::CatalogService;
