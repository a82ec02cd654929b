use crate::error::Error as LiteLlmKeysError;
use std::collections::BTreeSet;

/// Type assigned to the keys created without an explicit one.
pub const DEFAULT_KEY_TYPE: &str = "api_key";

/// Maximum length for a key name, in characters.
const MAX_KEY_NAME_LENGTH: usize = 100;
/// Maximum length for a key type, in characters.
const MAX_KEY_TYPE_LENGTH: usize = 50;
/// Maximum length for a key description, in characters.
const MAX_DESCRIPTION_LENGTH: usize = 1024;
/// Maximum length for a key secret (10 KB).
const MAX_API_KEY_LENGTH: usize = 10 * 1024;
/// Maximum number of groups a key can be shared with.
const MAX_GROUPS: usize = 100;

pub fn validate_key_name(key_name: &str) -> Result<(), LiteLlmKeysError> {
    if key_name.trim().is_empty() {
        return Err(LiteLlmKeysError::client("Key name cannot be empty."));
    }

    if key_name.chars().count() > MAX_KEY_NAME_LENGTH {
        return Err(LiteLlmKeysError::client(format!(
            "Key name cannot be longer than {MAX_KEY_NAME_LENGTH} characters."
        )));
    }

    Ok(())
}

pub fn validate_api_key(api_key: &str) -> Result<(), LiteLlmKeysError> {
    if api_key.trim().is_empty() {
        return Err(LiteLlmKeysError::client("API key cannot be empty."));
    }

    if api_key.len() > MAX_API_KEY_LENGTH {
        return Err(LiteLlmKeysError::client(format!(
            "API key must be at most {MAX_API_KEY_LENGTH} bytes."
        )));
    }

    Ok(())
}

pub fn validate_key_type(key_type: &str) -> Result<(), LiteLlmKeysError> {
    if key_type.trim().is_empty() || key_type.chars().count() > MAX_KEY_TYPE_LENGTH {
        return Err(LiteLlmKeysError::client(format!(
            "Key type cannot be empty or longer than {MAX_KEY_TYPE_LENGTH} characters."
        )));
    }

    Ok(())
}

pub fn validate_group_ids(group_ids: &[String]) -> Result<(), LiteLlmKeysError> {
    if group_ids.iter().any(|group_id| group_id.trim().is_empty()) {
        return Err(LiteLlmKeysError::client("Group ID cannot be empty."));
    }

    if group_ids.len() > MAX_GROUPS {
        return Err(LiteLlmKeysError::client(format!(
            "Key cannot be shared with more than {MAX_GROUPS} groups."
        )));
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), LiteLlmKeysError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(LiteLlmKeysError::client(format!(
            "Key description cannot be longer than {MAX_DESCRIPTION_LENGTH} characters."
        )));
    }

    Ok(())
}

pub fn validate_metadata(metadata: &serde_json::Value) -> Result<(), LiteLlmKeysError> {
    if !metadata.is_object() {
        return Err(LiteLlmKeysError::client("Key metadata must be a JSON object."));
    }

    Ok(())
}

/// Deduplicates and sorts group IDs.
pub fn normalize_group_ids(group_ids: &[String]) -> Vec<String> {
    group_ids
        .iter()
        .map(|group_id| group_id.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_group_ids, validate_api_key, validate_description, validate_group_ids,
        validate_key_name, validate_key_type, validate_metadata,
    };
    use serde_json::json;

    #[test]
    fn validates_key_names() {
        assert!(validate_key_name("prod").is_ok());
        assert!(validate_key_name(&"ж".repeat(100)).is_ok());

        assert_eq!(
            validate_key_name("").unwrap_err().message(),
            "Key name cannot be empty."
        );
        assert_eq!(
            validate_key_name("  ").unwrap_err().message(),
            "Key name cannot be empty."
        );
        assert_eq!(
            validate_key_name(&"a".repeat(101)).unwrap_err().message(),
            "Key name cannot be longer than 100 characters."
        );
    }

    #[test]
    fn validates_secrets() {
        assert!(validate_api_key("sk-1234").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key(&"a".repeat(10 * 1024 + 1)).is_err());
    }

    #[test]
    fn validates_other_fields() {
        assert!(validate_key_type("virtual_key").is_ok());
        assert!(validate_key_type("").is_err());

        assert!(validate_description("").is_ok());
        assert!(validate_description(&"a".repeat(1025)).is_err());

        assert!(validate_metadata(&json!({})).is_ok());
        assert!(validate_metadata(&json!("value")).is_err());
        assert!(validate_metadata(&json!(null)).is_err());

        assert!(validate_group_ids(&[]).is_ok());
        assert!(validate_group_ids(&["g1".to_string()]).is_ok());
        assert!(validate_group_ids(&[" ".to_string()]).is_err());
    }

    #[test]
    fn normalizes_group_ids() {
        assert_eq!(
            normalize_group_ids(&["g2".to_string(), " g1".to_string(), "g2".to_string()]),
            vec!["g1".to_string(), "g2".to_string()]
        );
    }
}
