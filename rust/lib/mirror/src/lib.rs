//! Client-side synchronization of catalog entity lists.
//!
//! A [`Mirror`] is the local, ordered copy of one remote collection. An
//! [`EntityList`] pairs it with a [`RemoteStore`](catalog_client::RemoteStore),
//! an [`EditBuffer`] and a detail selection, and enforces the update rules:
//! the server's response always replaces local state, creations are
//! prepended, deletions close whatever was showing the record, and a failed
//! call leaves the mirror untouched.

mod alert;
mod buffer;
mod error;
mod list;
mod mirror;

#[cfg(test)]
pub(crate) mod testing;

pub use alert::{Alert, AlertLevel, Alerts};
pub use buffer::{EditBuffer, EditMode};
pub use error::SyncError;
pub use list::EntityList;
pub use mirror::{ChangeHandler, Mirror, MirrorEvent, SubscriptionId};
