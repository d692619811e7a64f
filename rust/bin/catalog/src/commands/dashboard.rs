//! Commands built on the dashboard pages: search, latest releases,
//! license actions and notifications.

use anyhow::Result;
use catalog::model::{NotificationType, Release};
use catalog_dashboard::{
    AppContext, ClientsPage, LicensesPage, OverviewPage, ReleasesPage, SettingsPage, UpdatesPage,
};
use catalog_types::EntityId;

use super::{failed, print_info};
use crate::output::{print_list, print_one, Output};

/// What `catalog search` looks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchTarget {
    Products,
    Clients,
    Releases,
}

/// Case-insensitive search, as typed into a page's search box.
pub async fn search(ctx: &AppContext, target: SearchTarget, term: &str, output: Output) -> Result<()> {
    match target {
        SearchTarget::Products => {
            let mut page = OverviewPage::new(ctx);
            page.load().await.map_err(failed)?;
            page.search = term.to_string();
            let hits: Vec<_> = page.filtered().into_iter().cloned().collect();
            print_list(&hits, output)
        }
        SearchTarget::Clients => {
            let mut page = ClientsPage::new(ctx);
            page.load().await.map_err(failed)?;
            page.search = term.to_string();
            let hits: Vec<_> = page.filtered().into_iter().cloned().collect();
            print_list(&hits, output)
        }
        SearchTarget::Releases => {
            let mut page = UpdatesPage::new(ctx);
            page.load().await.map_err(failed)?;
            page.search = term.to_string();
            print_list(&page.feed(), output)
        }
    }
}

/// Newest release of one product, or of every product that has one.
pub async fn latest_releases(
    ctx: &AppContext,
    product: Option<EntityId>,
    output: Output,
) -> Result<()> {
    let mut page = ReleasesPage::new(ctx);
    page.load().await.map_err(failed)?;

    let latest: Vec<Release> = page
        .products()
        .iter()
        .filter(|p| product.map_or(true, |id| p.product_id == id))
        .filter_map(|p| {
            page.latest_for(p.product_id).map(|r| Release {
                product_name: Some(p.name.clone()),
                ..r
            })
        })
        .collect();

    if let Some(id) = product {
        if latest.is_empty() {
            anyhow::bail!("Product {} has no releases.", id);
        }
    }
    print_list(&latest, output)
}

/// Which license action to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseAction {
    Revoke,
    RegenerateKey,
}

pub async fn license(ctx: &AppContext, id: EntityId, action: LicenseAction, output: Output) -> Result<()> {
    let mut page = LicensesPage::new(ctx);
    page.load().await.map_err(failed)?;
    let result = match action {
        LicenseAction::Revoke => page.revoke(id).await,
        LicenseAction::RegenerateKey => page.regenerate_key(id).await,
    };
    let license = result.map_err(failed)?;
    print_info(page.take_alerts());
    print_one(&license, output)
}

/// Send a notification as the current user.
pub async fn notify(ctx: &AppContext, kind: &str, message: &str, output: Output) -> Result<()> {
    let Some(kind) = NotificationType::parse(kind) else {
        let names: Vec<&str> = NotificationType::ALL.iter().map(|t| t.as_str()).collect();
        anyhow::bail!("Unknown notification type: {} (expected one of {}).", kind, names.join(", "));
    };
    let mut page = SettingsPage::new(ctx);
    page.load().await.map_err(failed)?;
    let stored = page.add_notification(kind, message).await.map_err(failed)?;
    print_info(page.take_alerts());
    print_one(&stored, output)
}

/// The notification feed, newest first.
pub async fn notifications(ctx: &AppContext, unread_only: bool, output: Output) -> Result<()> {
    let mut page = SettingsPage::new(ctx);
    page.load().await.map_err(failed)?;
    let feed: Vec<_> = page
        .notifications()
        .iter()
        .filter(|n| !unread_only || !n.is_read)
        .cloned()
        .collect();
    print_list(&feed, output)?;
    if output == Output::Table {
        println!("\n{} unread", page.unread_count());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::start;
    use catalog::model::{License, LicenseStatus, Product};

    #[tokio::test]
    async fn latest_release_of_seeded_product() {
        let ctx = start().await;
        let product = ctx
            .api()
            .products()
            .create(&Product::new("Analytics Pro", "ANPR-001"))
            .await
            .unwrap();

        latest_releases(&ctx, Some(product.product_id), Output::Json)
            .await
            .unwrap();
        let err = latest_releases(&ctx, Some(999), Output::Table)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product 999 has no releases.");
        search(&ctx, SearchTarget::Products, "anpr", Output::Table)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn revoke_twice_is_refused() {
        let ctx = start().await;
        let license = ctx
            .api()
            .licenses()
            .create(&License {
                client_id: 1,
                product_id: 1,
                license_key: "ABCD1234-EFGH5678".into(),
                start_date: "2024-01-01".into(),
                end_date: "2030-01-01".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = license.license_id;

        license_cmd(&ctx, id, LicenseAction::Revoke).await.unwrap();
        let stored = ctx.api().licenses().get(id).await.unwrap();
        assert_eq!(stored.status, LicenseStatus::Revoked);

        let err = license_cmd(&ctx, id, LicenseAction::Revoke).await.unwrap_err();
        assert_eq!(err.to_string(), format!("License {} is already revoked.", id));

        license_cmd(&ctx, id, LicenseAction::RegenerateKey).await.unwrap();
        let stored = ctx.api().licenses().get(id).await.unwrap();
        assert_ne!(stored.license_key, "ABCD1234-EFGH5678");
    }

    async fn license_cmd(ctx: &AppContext, id: EntityId, action: LicenseAction) -> Result<()> {
        license(ctx, id, action, Output::Json).await
    }

    #[tokio::test]
    async fn notify_validates_type_and_message() {
        let ctx = start().await;
        assert!(notify(&ctx, "carrier_pigeon", "hi", Output::Table).await.is_err());
        assert!(notify(&ctx, "system_alert", "   ", Output::Table).await.is_err());

        notify(&ctx, "system_alert", "Maintenance tonight", Output::Table)
            .await
            .unwrap();
        let settings = ctx.api().settings().await.unwrap();
        assert!(settings
            .notifications
            .iter()
            .any(|n| n.message == "Maintenance tonight"));
        notifications(&ctx, true, Output::Table).await.unwrap();
    }
}
