use serde_derive::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Security related configuration.
#[derive(Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SecurityConfig {
    /// Hex-encoded 32-byte key used to encrypt stored API keys at rest. Storage-backed keys can't
    /// be created or read without it.
    pub secrets_encryption_key: Option<String>,
}

impl Debug for SecurityConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field(
                "secrets_encryption_key",
                &self.secrets_encryption_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
