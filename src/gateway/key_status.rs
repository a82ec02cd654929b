use serde::{Deserialize, Serialize};

/// Usage snapshot of the gateway-backed key.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct KeyStatus {
    pub id: String,
    pub is_active: bool,
    pub usage_count: u64,
    pub last_used: Option<String>,
    pub expires_at: Option<String>,
    pub budget_used: f64,
    pub budget_limit: Option<f64>,
}

/// Key info as it's reported by the gateway, every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub(super) struct RawKeyStatus {
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    usage_count: Option<u64>,
    #[serde(default)]
    last_used: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    budget_used: Option<f64>,
    #[serde(default)]
    budget_limit: Option<f64>,
}

impl RawKeyStatus {
    pub fn into_key_status(self, id: String) -> KeyStatus {
        KeyStatus {
            id,
            is_active: self.is_active.unwrap_or(true),
            usage_count: self.usage_count.unwrap_or_default(),
            last_used: self.last_used,
            expires_at: self.expires_at,
            budget_used: self.budget_used.unwrap_or_default(),
            budget_limit: self.budget_limit,
        }
    }
}
