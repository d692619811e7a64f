//! Headless dashboard for the catalog API.
//!
//! Each page controller owns the [`EntityList`](catalog_mirror::EntityList)s
//! it shows, performs its calls through the catalog client and exposes the
//! derived views in [`view`]. Rendering is left to the front end (the
//! `catalog` CLI is one).

mod context;
pub mod pages;
pub mod view;

pub use context::AppContext;
pub use pages::{
    ClientForm, ClientsPage, LicenseEdit, LicensesPage, LocationForm, OverviewPage, ProductCard,
    ProductsPage, ReleaseForm, ReleasesPage, SettingsPage, UpdatesPage,
};
