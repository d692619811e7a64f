//! `catalog`: the catalog CLI client.
//!
//! Manages server contexts and drives the dashboard pages from the
//! command line.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use catalog_types::EntityId;

use commands::dashboard::{LicenseAction, SearchTarget};
use commands::resource::Kind;
use output::Output;

/// Catalog CLI tool.
#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Catalog CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.catalog/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value = "table")]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage server contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Get resource(s).
    Get {
        /// Resource type (products, releases, clients, licenses).
        resource: String,
        /// Optional resource ID for single get.
        id: Option<EntityId>,
    },

    /// Create a resource.
    Create {
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource; the JSON fields replace the stored ones.
    Update {
        resource: String,
        id: EntityId,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource.
    Delete {
        resource: String,
        id: EntityId,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Case-insensitive search.
    Search {
        #[arg(value_enum)]
        target: SearchTarget,
        term: String,
    },

    /// Release queries.
    Releases {
        #[command(subcommand)]
        action: ReleasesAction,
    },

    /// License actions.
    License {
        #[command(subcommand)]
        action: LicenseCommand,
    },

    /// Send a notification as the current user.
    Notify {
        /// Notification type (e.g. system_alert, update_available).
        #[arg(long = "type", default_value = "system_alert")]
        kind: String,
        message: String,
    },

    /// List notifications, newest first.
    Notifications {
        #[arg(long)]
        unread: bool,
    },

    /// Check server status.
    Status,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Add or replace a context.
    Add {
        name: String,
        #[arg(long)]
        server: String,
    },
    /// List all contexts.
    List,
    /// Switch to a context.
    Use { name: String },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum ReleasesAction {
    /// Newest release per product.
    Latest {
        #[arg(long)]
        product: Option<EntityId>,
    },
}

#[derive(Subcommand, Debug)]
enum LicenseCommand {
    /// Revoke a license.
    Revoke { id: EntityId },
    /// Replace a license key with a fresh random one.
    RegenKey { id: EntityId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli.output;

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Add { name, server } => {
                commands::context::add(&name, &server, &config_path)?;
            }
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Use { name } => commands::context::use_context(&name, &config_path)?,
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path)?,
        },

        Commands::Get { resource, id } => {
            let ctx = commands::connect(&config_path)?;
            commands::resource::get(&ctx, Kind::parse(&resource)?, id, output).await?;
        }

        Commands::Create {
            resource,
            json_body,
            file,
        } => {
            let body = if let Some(path) = file {
                std::fs::read_to_string(&path)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            let ctx = commands::connect(&config_path)?;
            commands::resource::create(&ctx, Kind::parse(&resource)?, &body, output).await?;
        }

        Commands::Update {
            resource,
            id,
            json_body,
        } => {
            let ctx = commands::connect(&config_path)?;
            commands::resource::update(&ctx, Kind::parse(&resource)?, id, &json_body, output)
                .await?;
        }

        Commands::Delete { resource, id, yes } => {
            let kind = Kind::parse(&resource)?;
            if !yes {
                eprint!("Are you sure? [y/N]: ");
                let mut s = String::new();
                std::io::stdin().read_line(&mut s)?;
                if !s.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let ctx = commands::connect(&config_path)?;
            commands::resource::delete(&ctx, kind, id).await?;
        }

        Commands::Search { target, term } => {
            let ctx = commands::connect(&config_path)?;
            commands::dashboard::search(&ctx, target, &term, output).await?;
        }

        Commands::Releases { action } => match action {
            ReleasesAction::Latest { product } => {
                let ctx = commands::connect(&config_path)?;
                commands::dashboard::latest_releases(&ctx, product, output).await?;
            }
        },

        Commands::License { action } => {
            let (id, action) = match action {
                LicenseCommand::Revoke { id } => (id, LicenseAction::Revoke),
                LicenseCommand::RegenKey { id } => (id, LicenseAction::RegenerateKey),
            };
            let ctx = commands::connect(&config_path)?;
            commands::dashboard::license(&ctx, id, action, output).await?;
        }

        Commands::Notify { kind, message } => {
            let ctx = commands::connect(&config_path)?;
            commands::dashboard::notify(&ctx, &kind, &message, output).await?;
        }

        Commands::Notifications { unread } => {
            let ctx = commands::connect(&config_path)?;
            commands::dashboard::notifications(&ctx, unread, output).await?;
        }

        Commands::Status => commands::resource::status(&config_path).await?,

        Commands::Version => {
            println!("catalog cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_commands() {
        let cli = Cli::parse_from(["catalog", "-o", "json", "license", "regen-key", "7"]);
        assert_eq!(cli.output, Output::Json);
        assert!(matches!(
            cli.command,
            Commands::License {
                action: LicenseCommand::RegenKey { id: 7 }
            }
        ));

        let cli = Cli::parse_from(["catalog", "search", "clients", "acme"]);
        assert!(matches!(
            cli.command,
            Commands::Search {
                target: SearchTarget::Clients,
                ..
            }
        ));
    }
}
