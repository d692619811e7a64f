//! Generic resource CRUD commands.
//!
//! `catalog get products`, `catalog create client --json ...`, etc.
//! Lists go through the dashboard pages; writes go through an entity
//! list so required fields are checked before anything is sent.

use anyhow::Result;
use catalog_client::ResourceClient;
use catalog_dashboard::pages::List;
use catalog_dashboard::{AppContext, ClientsPage, LicensesPage, ProductsPage, UpdatesPage};
use catalog_types::{EntityId, Resource, Validate};

use super::{failed, print_info};
use crate::config::ClientConfig;
use crate::output::{print_list, print_one, Output, Row};

/// Resource types the CLI manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Product,
    Release,
    Client,
    License,
}

impl Kind {
    /// Accepts the singular or plural name.
    pub fn parse(resource: &str) -> Result<Self> {
        match resource.to_lowercase().as_str() {
            "product" | "products" => Ok(Kind::Product),
            "release" | "releases" => Ok(Kind::Release),
            "client" | "clients" => Ok(Kind::Client),
            "license" | "licenses" => Ok(Kind::License),
            _ => Err(anyhow::anyhow!("Unknown resource type: {}", resource)),
        }
    }
}

/// GET a resource (list, or one by id).
pub async fn get(ctx: &AppContext, kind: Kind, id: Option<EntityId>, output: Output) -> Result<()> {
    let api = ctx.api();
    if let Some(id) = id {
        return match kind {
            Kind::Product => get_one(api.products(), id, output).await,
            Kind::Release => get_one(api.releases(), id, output).await,
            Kind::Client => get_one(api.clients(), id, output).await,
            Kind::License => get_one(api.licenses(), id, output).await,
        };
    }

    match kind {
        Kind::Product => {
            let mut page = ProductsPage::new(ctx);
            page.load(ctx).await.map_err(failed)?;
            print_list(page.products(), output)
        }
        Kind::Release => {
            let mut page = UpdatesPage::new(ctx);
            page.load().await.map_err(failed)?;
            print_list(&page.feed(), output)
        }
        Kind::Client => {
            let mut page = ClientsPage::new(ctx);
            page.load().await.map_err(failed)?;
            print_list(page.clients(), output)
        }
        Kind::License => {
            let mut page = LicensesPage::new(ctx);
            page.load().await.map_err(failed)?;
            print_list(page.licenses(), output)
        }
    }
}

async fn get_one<T>(client: ResourceClient<T>, id: EntityId, output: Output) -> Result<()>
where
    T: Resource + Row,
{
    let item = client.get(id).await.map_err(|e| failed(e.into()))?;
    print_one(&item, output)
}

/// CREATE a resource from a JSON body. The stored record is printed.
pub async fn create(ctx: &AppContext, kind: Kind, json_body: &str, output: Output) -> Result<()> {
    let api = ctx.api();
    match kind {
        Kind::Product => create_typed(api.products(), json_body, output).await,
        Kind::Release => create_typed(api.releases(), json_body, output).await,
        Kind::Client => create_typed(api.clients(), json_body, output).await,
        Kind::License => create_typed(api.licenses(), json_body, output).await,
    }
}

async fn create_typed<T>(client: ResourceClient<T>, json_body: &str, output: Output) -> Result<()>
where
    T: Resource + Default + Validate + Row,
{
    let item: T = serde_json::from_str(json_body)
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
    let mut list: List<T> = List::new(client);
    let stored = list.create(&item).await.map_err(failed)?;
    print_info(list.take_alerts());
    print_one(&stored, output)
}

/// UPDATE a resource: the JSON body's top-level fields are laid over the
/// current record and the result is saved whole.
pub async fn update(
    ctx: &AppContext,
    kind: Kind,
    id: EntityId,
    json_body: &str,
    output: Output,
) -> Result<()> {
    let patch: serde_json::Value = serde_json::from_str(json_body)
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
    let api = ctx.api();
    match kind {
        Kind::Product => update_typed(api.products(), id, &patch, output).await,
        Kind::Release => update_typed(api.releases(), id, &patch, output).await,
        Kind::Client => update_typed(api.clients(), id, &patch, output).await,
        Kind::License => update_typed(api.licenses(), id, &patch, output).await,
    }
}

async fn update_typed<T>(
    client: ResourceClient<T>,
    id: EntityId,
    patch: &serde_json::Value,
    output: Output,
) -> Result<()>
where
    T: Resource + Default + Validate + Row,
{
    let current = client.get(id).await.map_err(|e| failed(e.into()))?;
    let merged: T = overlay(&current, patch)?;
    let mut list: List<T> = List::new(client);
    let stored = list.update(id, &merged).await.map_err(failed)?;
    print_info(list.take_alerts());
    print_one(&stored, output)
}

/// `base` with the top-level fields of `patch` replaced.
fn overlay<T: Resource>(base: &T, patch: &serde_json::Value) -> Result<T> {
    let Some(fields) = patch.as_object() else {
        anyhow::bail!("Update body must be a JSON object.");
    };
    let mut value = serde_json::to_value(base)?;
    if let Some(obj) = value.as_object_mut() {
        for (k, v) in fields {
            obj.insert(k.clone(), v.clone());
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// DELETE a resource.
pub async fn delete(ctx: &AppContext, kind: Kind, id: EntityId) -> Result<()> {
    let api = ctx.api();
    match kind {
        Kind::Product => delete_typed(api.products(), id).await,
        Kind::Release => delete_typed(api.releases(), id).await,
        Kind::Client => delete_typed(api.clients(), id).await,
        Kind::License => delete_typed(api.licenses(), id).await,
    }
}

async fn delete_typed<T: Resource + Default>(client: ResourceClient<T>, id: EntityId) -> Result<()> {
    let mut list: List<T> = List::new(client);
    list.remove(id).await.map_err(failed)?;
    print_info(list.take_alerts());
    Ok(())
}

/// STATUS: check server health.
pub async fn status(client_config_path: &std::path::Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let context = config.current().map(|c| c.name.as_str()).unwrap_or("-");
    println!("Context:   {}", context);

    let server = match config.server_url() {
        Ok(s) => s,
        Err(e) => {
            println!("Status:    {}", e);
            return Ok(());
        }
    };
    println!("Server:    {}", server);

    let api = catalog_client::CatalogApi::new(&server);
    match api.health().await {
        Ok(_) => println!("Status:    connected"),
        Err(e) => {
            println!("Status:    disconnected ({})", e);
            return Ok(());
        }
    }
    if let Ok(time) = api.server_time().await {
        println!("Time:      {}", time);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::start;
    use catalog::model::Product;

    #[test]
    fn kind_names() {
        assert_eq!(Kind::parse("Products").unwrap(), Kind::Product);
        assert_eq!(Kind::parse("license").unwrap(), Kind::License);
        assert!(Kind::parse("widgets").is_err());
    }

    #[test]
    fn overlay_replaces_top_level_fields() {
        let base = Product {
            product_id: 3,
            description: Some("old".into()),
            ..Product::new("Analytics", "AN-1")
        };
        let merged: Product =
            overlay(&base, &serde_json::json!({"name": "Analytics Pro"})).unwrap();
        assert_eq!(merged.name, "Analytics Pro");
        assert_eq!(merged.sku, "AN-1");
        assert_eq!(merged.description.as_deref(), Some("old"));
        assert!(overlay(&base, &serde_json::json!([1])).is_err());
    }

    #[tokio::test]
    async fn create_update_delete_product() {
        let ctx = start().await;
        create(
            &ctx,
            Kind::Product,
            r#"{"name": "CRM Suite", "sku": "CRM-200"}"#,
            Output::Json,
        )
        .await
        .unwrap();
        let products = ctx.api().products().list().await.unwrap();
        let id = products[0].product_id;

        update(&ctx, Kind::Product, id, r#"{"description": "Sales"}"#, Output::Table)
            .await
            .unwrap();
        let stored = ctx.api().products().get(id).await.unwrap();
        assert_eq!(stored.description.as_deref(), Some("Sales"));
        assert_eq!(stored.sku, "CRM-200");

        get(&ctx, Kind::Product, None, Output::Table).await.unwrap();
        delete(&ctx, Kind::Product, id).await.unwrap();
        assert!(ctx.api().products().get(id).await.is_err());
    }

    #[tokio::test]
    async fn create_reports_missing_fields() {
        let ctx = start().await;
        let err = create(&ctx, Kind::Client, r#"{"name": "Acme"}"#, Output::Table)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields: email, primaryContact."
        );
    }

    #[tokio::test]
    async fn missing_record_is_a_generic_failure() {
        let ctx = start().await;
        let err = get(&ctx, Kind::License, Some(99), Output::Table)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The request to the catalog server failed.");
    }
}
