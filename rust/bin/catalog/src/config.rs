//! Client-side context management.
//!
//! Reads/writes `~/.catalog/config.toml`.

use std::path::{Path, PathBuf};

use catalog_client::BASE_URL_ENV;
use serde::{Deserialize, Serialize};

/// A named catalog server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "staging").
    pub name: String,

    /// Server URL (e.g. "http://localhost:8000").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.catalog/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Add or replace a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        match self.contexts.iter_mut().find(|c| c.name == ctx.name) {
            Some(existing) => *existing = ctx,
            None => self.contexts.push(ctx),
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }

    /// Server URL to talk to. `CATALOG_API_URL` wins over the current
    /// context.
    pub fn server_url(&self) -> anyhow::Result<String> {
        let env = std::env::var(BASE_URL_ENV).ok();
        self.resolve_server(env.as_deref())
    }

    fn resolve_server(&self, env: Option<&str>) -> anyhow::Result<String> {
        if let Some(url) = env.map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.trim_end_matches('/').to_string());
        }
        let Some(ctx) = self.current() else {
            anyhow::bail!(
                "No current context. Run `catalog context add <name> --server <url>` or set {}.",
                BASE_URL_ENV
            );
        };
        if ctx.server.is_empty() {
            anyhow::bail!("No server URL set for context \"{}\".", ctx.name);
        }
        Ok(ctx.server.trim_end_matches('/').to_string())
    }
}

/// The catalog config directory (~/.catalog).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".catalog")
}
