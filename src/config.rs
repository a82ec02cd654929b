mod database_config;
mod gateway_config;
mod host_config;
mod http_config;
mod keys_config;
mod raw_config;
mod security_config;

pub use self::{
    database_config::DatabaseConfig,
    gateway_config::GatewayConfig,
    host_config::HostConfig,
    http_config::{HttpClientConfig, HttpConfig},
    keys_config::{KeysBackend, KeysConfig},
    raw_config::RawConfig,
    security_config::SecurityConfig,
};

/// Main server config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Version of the binary.
    pub version: String,
    /// HTTP port to bind API server to.
    pub http_port: u16,
    /// Database configuration.
    pub db: DatabaseConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Host platform integration.
    pub host: HostConfig,
    /// Key management configuration.
    pub keys: KeysConfig,
    /// LiteLLM gateway integration.
    pub gateway: GatewayConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            http_port: raw_config.port,
            db: raw_config.db,
            security: raw_config.security,
            host: raw_config.host,
            keys: raw_config.keys,
            gateway: raw_config.gateway,
            http: raw_config.http,
        }
    }
}
