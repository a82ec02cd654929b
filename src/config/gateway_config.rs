use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use url::Url;

/// Configuration for the LiteLLM gateway that issues and stores keys for the `gateway` backend.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the LiteLLM gateway.
    pub url: Url,
    /// Master credential used for every call to the gateway. Whoever holds it can manage all keys
    /// directly, bypassing per-user scoping enforced by this service.
    pub master_key: Option<String>,
    /// Whether the gateway integration is enabled at all.
    pub enabled: bool,
}

impl GatewayConfig {
    /// Returns the master key if the integration is enabled and configured.
    pub fn active_master_key(&self) -> Option<&str> {
        if self.enabled {
            self.master_key.as_deref().filter(|key| !key.is_empty())
        } else {
            None
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:4000").expect("Cannot parse gateway URL parameter."),
            master_key: None,
            enabled: true,
        }
    }
}

impl Debug for GatewayConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url.as_str())
            .field("master_key", &self.master_key.as_ref().map(|_| "<redacted>"))
            .field("enabled", &self.enabled)
            .finish()
    }
}
