use crate::{
    keys::{DEFAULT_KEY_TYPE, LiteLlmKey, mask_api_key},
    users::{Caller, UserId},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnError, PickFirst, TimestampSecondsWithFrac, VecSkipError, serde_as};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Unix seconds or an RFC 3339 string, anything else reads as no timestamp.
type LenientTimestamp =
    DefaultOnError<Option<PickFirst<(TimestampSecondsWithFrac<f64>, Rfc3339)>>>;

/// Key record as it's returned by the gateway.
#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GatewayKey {
    #[serde(alias = "key_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default, alias = "key")]
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
    pub metadata: Option<Value>,
    #[serde_as(as = "LenientTimestamp")]
    #[serde(default)]
    pub created_at: Option<OffsetDateTime>,
    #[serde_as(as = "LenientTimestamp")]
    #[serde(default)]
    pub updated_at: Option<OffsetDateTime>,
    #[serde_as(as = "LenientTimestamp")]
    #[serde(default)]
    pub last_used_at: Option<OffsetDateTime>,
}

impl GatewayKey {
    /// Converts the gateway record to the one returned to the caller, with the masked secret.
    /// Records without an owner aren't managed by this service and are skipped.
    pub fn into_litellm_key(self, caller: &Caller) -> anyhow::Result<Option<LiteLlmKey>> {
        let Some(user_id) = self.user_id.filter(|user_id| !user_id.trim().is_empty()) else {
            return Ok(None);
        };

        let user_id = UserId::new(user_id)?;
        let created_at = self
            .created_at
            .map(whole_seconds)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        Ok(Some(LiteLlmKey {
            id: self.id,
            is_shared: user_id != caller.id,
            user_id,
            key_name: self.key_name.unwrap_or_default(),
            api_key: mask_api_key(self.api_key.as_deref().unwrap_or_default()),
            key_type: self
                .key_type
                .unwrap_or_else(|| DEFAULT_KEY_TYPE.to_string()),
            group_ids: self.group_ids.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            description: self.description,
            metadata: self.metadata,
            created_at,
            updated_at: self.updated_at.map(whole_seconds).unwrap_or(created_at),
            last_used_at: self.last_used_at.map(whole_seconds),
        }))
    }
}

/// List of keys as it's returned by the gateway. Records that can't be read are dropped.
#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GatewayKeys {
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub data: Vec<GatewayKey>,
}

/// Secret issued by the gateway for a new key.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GatewayGeneratedKey {
    pub key_id: String,
    pub key: String,
}

/// Parameters of the gateway key generation request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GatewayKeyGenerateParams<'p> {
    pub user_id: &'p str,
    pub key_name: &'p str,
    pub key_type: &'p str,
    pub groups: &'p [String],
    pub description: Option<&'p str>,
    /// No expiration.
    pub duration: Option<String>,
    /// All models are allowed.
    pub models: Vec<String>,
    /// No budget limit.
    pub max_budget: Option<f64>,
    pub metadata: &'p Value,
}

/// Parameters of the gateway key update request. The gateway always receives the full state of
/// the mutable fields.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GatewayKeyUpdateParams<'p> {
    pub key_id: &'p str,
    pub user_id: &'p str,
    pub key_name: &'p str,
    pub key_type: &'p str,
    pub groups: &'p [String],
    pub is_active: bool,
    pub description: Option<&'p str>,
    pub metadata: Option<&'p Value>,
}

/// Parameters of the gateway key deletion request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GatewayKeyDeleteParams<'p> {
    pub key_id: &'p str,
    pub user_id: &'p str,
}

fn whole_seconds(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp.replace_nanosecond(0).unwrap_or(timestamp)
}
