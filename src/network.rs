use crate::config::HttpClientConfig;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

/// Network utilities.
#[derive(Clone)]
pub struct Network {
    /// HTTP client used to reach the host platform and the LiteLLM gateway.
    pub http_client: ClientWithMiddleware,
}

impl Network {
    /// Creates a new `Network` instance.
    pub fn new(http_client: ClientWithMiddleware) -> Self {
        Self { http_client }
    }

    /// Creates a new `Network` instance with the HTTP client built from the config. Outgoing
    /// requests are traced, but never retried.
    pub fn from_config(config: &HttpClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .connection_verbose(config.verbose)
            .build()?;

        Ok(Self::new(
            ClientBuilder::new(client)
                .with(TracingMiddleware::default())
                .build(),
        ))
    }
}
