//! Shared vocabulary for catalog resources.
//!
//! Every record managed by the catalog API implements [`Resource`]: it has a
//! server-assigned integer id and lives under a fixed collection path. The
//! HTTP client derives its URLs from these constants and the local mirror
//! keys its entries by [`Resource::id`].

pub mod timestamp;
pub mod validate;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use timestamp::{now_rfc3339, parse_instant};
pub use validate::{RequiredFields, Validate, ValidationError};

/// Server-assigned record identifier.
pub type EntityId = i64;

/// A record type exposed as a REST collection.
///
/// `PATH` is the collection segment below `/api` (e.g. `products`, or
/// `artifacts` for a collection nested under a release).
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular, human-readable name ("product", "client").
    const NAME: &'static str;

    /// Collection path segment.
    const PATH: &'static str;

    /// Key of the `{ "<key>": [...] }` envelope some list endpoints return.
    /// Defaults to the collection path.
    fn envelope_key() -> &'static str {
        Self::PATH
    }

    /// Server-assigned id. Zero for drafts that were never saved.
    fn id(&self) -> EntityId;
}
