use crate::users::UserId;
use serde::Serialize;
use time::OffsetDateTime;

/// LiteLLM API key record as it's returned to the clients. The `api_key` holds the plain secret
/// only in the response to the key creation, and the masked one everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteLlmKey {
    /// Unique identifier of the key record.
    pub id: String,
    /// The user who created the key, ownership never changes.
    pub user_id: UserId,
    /// Human-readable key name, unique per owner.
    pub key_name: String,
    /// The secret, masked unless the key has just been created.
    pub api_key: String,
    /// Type of the key.
    pub key_type: String,
    /// Groups whose members can see the key.
    pub group_ids: Vec<String>,
    /// Whether the key is active.
    pub is_active: bool,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
    /// Informational only, reported by the gateway.
    #[serde(with = "time::serde::timestamp::option")]
    pub last_used_at: Option<OffsetDateTime>,
    /// Whether the key is visible to the caller through a group rather than ownership.
    pub is_shared: bool,
}
