use serde::Serialize;

/// Result of the LiteLLM gateway connectivity check.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// Whether the gateway responded to the health check.
    pub connected: bool,
    /// Configured base URL of the gateway.
    pub base_url: String,
    /// Whether the gateway integration is enabled.
    pub enabled: bool,
    /// Whether the master credential is configured.
    pub master_key_configured: bool,
}
