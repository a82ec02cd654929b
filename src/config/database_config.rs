use serde_derive::{Deserialize, Serialize};

/// Configuration for the database used by the storage-backed keys.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// SQLite connection URL, the database file is created if it doesn't exist.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://litellm-keys.db".to_string(),
            max_connections: 5,
        }
    }
}
