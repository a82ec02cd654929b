use serde::{Deserialize, Serialize};

/// Defines where LiteLLM key records live.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeysBackend {
    /// Keys are persisted in the local database, with secrets encrypted at rest. Every owner is
    /// isolated from every other owner by this service.
    #[default]
    Storage,
    /// Keys are held by the LiteLLM gateway and managed through its API with a shared master
    /// credential. Per-user scoping is enforced only by this service.
    Gateway,
}

/// Configuration for the key management functionality.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct KeysConfig {
    /// Backend that stores the key records.
    pub backend: KeysBackend,
}
