use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Configuration for the HTTP functionality.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct HttpConfig {
    /// Configuration for the HTTP client used to reach the host platform and the LiteLLM gateway.
    pub client: HttpClientConfig,
}

/// Describes the HTTP client configuration. Requests are never retried: a failed call to the
/// host platform or to the gateway surfaces to the caller right away.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Total request timeout. The timeout is applied from when the request starts connecting until
    /// the response body has finished. Default is 30 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Timeout for idle sockets being kept-alive. Default is 5 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: Duration,
    /// Defines whether HTTP client connections should emit verbose logs. Default is false.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle_timeout(),
            verbose: false,
        }
    }
}

/// Defines default timeout for idle sockets being kept-alive.
const fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Default total request timeout.
const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
