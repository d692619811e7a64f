//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// Add or replace a context. The first context added becomes current.
pub fn add(name: &str, server: &str, client_config_path: &Path) -> Result<()> {
    if server.trim().is_empty() {
        anyhow::bail!("Server URL cannot be empty.");
    }

    let mut config = ClientConfig::load(client_config_path)?;
    config.upsert_context(Context {
        name: name.to_string(),
        server: server.trim().to_string(),
    });
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(client_config_path)?;

    println!("Context \"{}\" saved.", name);
    println!("  Server: {}", server.trim());
    Ok(())
}

pub fn list(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: catalog context add <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40}", "", "NAME", "SERVER");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        println!("{:2} {:20} {:40}", marker, ctx.name, server);
    }

    Ok(())
}

/// Switch current context.
pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if config.get(name).is_none() {
        anyhow::bail!(
            "Context \"{}\" not found. Run `catalog context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(client_config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }

    config.save(client_config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_use_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        add("local", "http://127.0.0.1:8000", &path).unwrap();
        add("staging", "http://staging:8000", &path).unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.current_context, "local");
        assert_eq!(config.contexts.len(), 2);

        use_context("staging", &path).unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap().current_context, "staging");
        assert!(use_context("missing", &path).is_err());

        delete("staging", &path).unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert!(config.current().is_none());
        assert!(delete("staging", &path).is_err());
    }

    #[test]
    fn blank_server_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(add("local", "  ", &path).is_err());
        assert!(!path.exists());
    }
}
