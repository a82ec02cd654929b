use crate::config::{
    DatabaseConfig, GatewayConfig, HostConfig, HttpConfig, KeysConfig, SecurityConfig,
};
use figment::{Figment, Metadata, Profile, Provider, providers, providers::Format, value};
use serde_derive::{Deserialize, Serialize};

/// Legacy environment variables understood for the gateway integration, mapped to their
/// configuration paths.
const GATEWAY_ENV_ALIASES: [(&str, &str); 3] = [
    ("LITELLM_MASTER_API_KEY", "gateway.master_key"),
    ("LITELLM_BASE_URL", "gateway.url"),
    ("LITELLM_ENABLED", "gateway.enabled"),
];

/// Raw configuration structure that is used to read the configuration from the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RawConfig {
    /// Defines a TCP port to listen on.
    pub port: u16,
    /// Database configuration.
    pub db: DatabaseConfig,
    /// Security configuration (encryption at rest).
    pub security: SecurityConfig,
    /// Configuration for the host platform integration.
    pub host: HostConfig,
    /// Configuration for the key management functionality.
    pub keys: KeysConfig,
    /// Configuration for the LiteLLM gateway integration.
    pub gateway: GatewayConfig,
    /// Configuration for the HTTP functionality.
    pub http: HttpConfig,
}

impl RawConfig {
    /// Reads the configuration from the file (TOML) and merges it with the default values and
    /// environment variables.
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(Figment::from(RawConfig::default())
            .merge(providers::Toml::file(path))
            .merge(
                providers::Env::raw()
                    .only(&GATEWAY_ENV_ALIASES.map(|(env, _)| env))
                    .map(|key| {
                        GATEWAY_ENV_ALIASES
                            .iter()
                            .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
                            .map(|(_, path)| (*path).into())
                            .unwrap_or_else(|| key.as_str().to_owned().into())
                    }),
            )
            .merge(providers::Env::prefixed("LITELLM_KEYS_").split("__"))
            .extract()?)
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            port: 7171,
            db: DatabaseConfig::default(),
            security: SecurityConfig::default(),
            host: HostConfig::default(),
            keys: KeysConfig::default(),
            gateway: GatewayConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Provider for RawConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("LiteLLM keys main configuration")
    }

    fn data(&self) -> Result<value::Map<Profile, value::Dict>, figment::Error> {
        providers::Serialized::defaults(Self::default()).data()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{KeysBackend, RawConfig};
    use std::time::Duration;
    use url::Url;

    #[test]
    fn deserialization() {
        let config: RawConfig = toml::from_str(
            r#"
        port = 7272

        [db]
        url = 'sqlite::memory:'
        max-connections = 1

        [security]
        secrets_encryption_key = 'a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2'

        [host]
        url = 'http://localhost:3000/'

        [keys]
        backend = 'gateway'

        [gateway]
        url = 'http://localhost:4000/'
        master_key = 'sk-master'
        enabled = true

        [http.client]
        timeout = 10000
        pool_idle_timeout = 5000
        verbose = false
    "#,
        )
        .unwrap();

        assert_eq!(config.port, 7272);
        assert_eq!(config.db.url, "sqlite::memory:");
        assert_eq!(config.db.max_connections, 1);
        assert!(config.security.secrets_encryption_key.is_some());
        assert_eq!(config.host.url, Url::parse("http://localhost:3000").unwrap());
        assert_eq!(config.keys.backend, KeysBackend::Gateway);
        assert_eq!(config.gateway.master_key.as_deref(), Some("sk-master"));
        assert_eq!(config.http.client.timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_defaults_when_file_is_missing() -> anyhow::Result<()> {
        let config = RawConfig::read_from_file("./this-file-does-not-exist.toml")?;
        assert_eq!(config.db, RawConfig::default().db);
        assert_eq!(config.keys, RawConfig::default().keys);

        Ok(())
    }
}
