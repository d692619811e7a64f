use std::path::PathBuf;

/// Server configuration.
///
/// `catalogd` fills this from its command-line flags before opening the
/// store and binding the listener.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding one JSON file per collection.
    /// `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            listen: "127.0.0.1:8000".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Path of a collection file (`products.json`, ...), if persistence is on.
    pub fn collection_file(&self, name: &str) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join(format!("{}.json", name)))
    }
}
