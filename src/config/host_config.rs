use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the integration with the host chat platform that authenticates users and
/// owns group memberships.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// The URL to access the host platform API.
    pub url: Url,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8080").expect("Cannot parse host URL parameter."),
        }
    }
}
