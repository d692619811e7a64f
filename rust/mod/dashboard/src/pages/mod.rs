//! One controller per dashboard page.

mod clients;
mod licenses;
mod overview;
mod products;
mod releases;
mod settings;
mod updates;

use catalog_client::ResourceClient;
use catalog_mirror::{Alert, Alerts, EntityList, SyncError};
use catalog_types::EntityId;
use tracing::warn;

pub use clients::{ClientForm, ClientsPage, LocationForm};
pub use licenses::{status_label, LicenseEdit, LicensesPage, EXPIRED_MARKER};
pub use overview::{OverviewPage, ProductCard};
pub use products::ProductsPage;
pub use releases::{ReleasesPage, DRAFT_VERSION};
pub use settings::SettingsPage;
pub use updates::{ReleaseForm, UpdatesPage, UNKNOWN_PRODUCT};

/// An entity list synchronized over HTTP.
pub type List<T> = EntityList<T, ResourceClient<T>>;

/// Alerts from a page's own calls followed by those of its lists.
fn drain(own: &mut Alerts, lists: impl IntoIterator<Item = Vec<Alert>>) -> Vec<Alert> {
    let mut all = own.take();
    for list in lists {
        all.extend(list);
    }
    all
}

/// Queue the user-facing message for a failed page-level call.
fn report(alerts: &mut Alerts, op: &str, err: SyncError) -> SyncError {
    warn!(op, error = %err, "page operation failed");
    alerts.error(err.user_message());
    err
}

/// Millisecond timestamp used as a client-generated id.
fn generated_id() -> EntityId {
    chrono::Utc::now().timestamp_millis()
}
