use crate::{keys::LiteLlmKey, users::Caller, users::UserId};
use time::OffsetDateTime;

/// LiteLLM key record as it's persisted by the storage backend, with the secret encrypted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLiteLlmKey {
    pub id: String,
    pub user_id: UserId,
    pub key_name: String,
    /// Encrypted secret, `nonce || ciphertext || tag`.
    pub api_key: Vec<u8>,
    pub key_type: String,
    pub group_ids: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_used_at: Option<OffsetDateTime>,
}

impl StoredLiteLlmKey {
    /// Converts the stored record to the one returned to the caller, with the given (masked or
    /// plain) secret.
    pub fn into_litellm_key(self, api_key: String, caller: &Caller) -> LiteLlmKey {
        let is_shared = self.user_id != caller.id;
        LiteLlmKey {
            id: self.id,
            user_id: self.user_id,
            key_name: self.key_name,
            api_key,
            key_type: self.key_type,
            group_ids: self.group_ids,
            is_active: self.is_active,
            description: self.description,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_used_at: self.last_used_at,
            is_shared,
        }
    }
}
