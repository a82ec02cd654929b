use crate::{error::Error as LiteLlmKeysError, keys::validation};
use serde::Deserialize;

/// Partial update of the LiteLLM key. Fields that are omitted stay untouched.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LiteLlmKeyUpdateParams {
    #[serde(default)]
    pub key_name: Option<String>,
    /// New secret, only accepted by the storage backend.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub key_type: Option<String>,
    #[serde(default, alias = "groups")]
    pub group_ids: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl LiteLlmKeyUpdateParams {
    /// Returns `true` if the update doesn't change anything.
    pub fn is_empty(&self) -> bool {
        self.key_name.is_none()
            && self.api_key.is_none()
            && self.key_type.is_none()
            && self.group_ids.is_none()
            && self.is_active.is_none()
            && self.description.is_none()
            && self.metadata.is_none()
    }

    /// Validates parameters that don't depend on the caller or the backend.
    pub fn validate(&self) -> Result<(), LiteLlmKeysError> {
        if self.is_empty() {
            return Err(LiteLlmKeysError::client(
                "Either new key name, secret, type, groups, state, description, or metadata should be provided.",
            ));
        }

        if let Some(ref key_name) = self.key_name {
            validation::validate_key_name(key_name)?;
        }
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

    /// Returns new groups, deduplicated and sorted, if they are being updated.
    pub fn group_ids(&self) -> Option<Vec<String>> {
        self.group_ids
            .as_deref()
            .map(validation::normalize_group_ids)
    }
}
