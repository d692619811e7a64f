//! Read-only projections over mirrored records. Nothing here touches the
//! network; everything is recomputed on each call.

mod aggregate;
mod format;
mod group;
mod search;

pub use aggregate::{
    active_license_count, artifacts_of, dependencies_of, unique_client_names, unread_count,
    update_logs_of,
};
pub use format::{fmt_date, fmt_datetime, fmt_size, NO_DATE};
pub use group::{group_releases, latest_release, sort_newest_first, ReleasesByProduct};
pub use search::{matches, search, Searchable};
