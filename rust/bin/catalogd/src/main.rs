//! `catalogd`: the catalog REST server.
//!
//! Usage:
//!   catalogd [--listen <addr>] [--data-dir <dir>]
//!
//! Without `--data-dir` every collection lives in memory and is lost on
//! exit.

mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use catalog::{CatalogModule, CatalogService};
use catalog_core::{Module, ServiceConfig};
use tracing::info;

/// Catalog server.
#[derive(Parser, Debug)]
#[command(name = "catalogd", about = "Catalog REST server")]
struct Cli {
    /// Listen address.
    #[arg(long = "listen", default_value = "127.0.0.1:8000")]
    listen: String,

    /// Directory for the collection files. Omit to run in memory.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            data_dir: self.data_dir.clone(),
            listen: self.listen.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.service_config();

    let service = CatalogService::open(config.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to open catalog store: {}", e))?;
    if config.data_dir.is_none() {
        info!("No data directory; collections are kept in memory");
    }

    let modules: Vec<Box<dyn Module>> = vec![Box::new(CatalogModule::new(Arc::new(service)))];
    for m in &modules {
        info!("Module {} mounted at /{}/", m.name(), m.name());
    }

    let app = routes::build_router(&modules);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Catalog server listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
