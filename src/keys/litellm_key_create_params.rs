use crate::{error::Error as LiteLlmKeysError, keys::validation};
use serde::Deserialize;

/// Parameters for the new LiteLLM key.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LiteLlmKeyCreateParams {
    /// Human-readable key name.
    pub key_name: String,
    /// Secret to store, only accepted by the storage backend. A new secret is generated if it's
    /// omitted.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Type of the key, `api_key` if omitted.
    #[serde(default)]
    pub key_type: Option<String>,
    /// Groups to share the key with.
    #[serde(default, alias = "groups")]
    pub group_ids: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl LiteLlmKeyCreateParams {
    /// Validates parameters that don't depend on the caller or the backend.
    pub fn validate(&self) -> Result<(), LiteLlmKeysError> {
        validation::validate_key_name(&self.key_name)?;
        if let Some(ref api_key) = self.api_key {
            validation::validate_api_key(api_key)?;
        }
        if let Some(ref key_type) = self.key_type {
            validation::validate_key_type(key_type)?;
        }
        if let Some(ref group_ids) = self.group_ids {
            validation::validate_group_ids(group_ids)?;
        }
        if let Some(ref description) = self.description {
            validation::validate_description(description)?;
        }
        if let Some(ref metadata) = self.metadata {
            validation::validate_metadata(metadata)?;
        }

        Ok(())
    }

    /// Returns the key type, falling back to the default one.
    pub fn key_type(&self) -> &str {
        self.key_type
            .as_deref()
            .unwrap_or(validation::DEFAULT_KEY_TYPE)
    }

    /// Returns the groups to share the key with, deduplicated and sorted.
    pub fn group_ids(&self) -> Vec<String> {
        validation::normalize_group_ids(self.group_ids.as_deref().unwrap_or_default())
    }
}
