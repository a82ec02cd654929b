use crate::{
    api::Api,
    error::Error as LiteLlmKeysError,
    gateway::{
        ConnectionStatus, KeyStatus,
        gateway_key::{
            GatewayGeneratedKey, GatewayKey, GatewayKeyDeleteParams, GatewayKeyGenerateParams,
            GatewayKeyUpdateParams, GatewayKeys,
        },
        key_status::RawKeyStatus,
    },
};
use anyhow::{anyhow, bail};
use reqwest::{Response, StatusCode};
use reqwest_middleware::RequestBuilder;
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Low-level client of the LiteLLM gateway management API. Every request is authorized with the
/// master credential and is never retried.
pub struct GatewayApi<'a> {
    api: &'a Api,
}

impl<'a> GatewayApi<'a> {
    /// Creates LiteLLM gateway API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Retrieves all keys known to the gateway.
    pub async fn list_keys(&self) -> anyhow::Result<Vec<GatewayKey>> {
        let response = self
            .send(
                self.api.network.http_client.get(self.endpoint(&["key", "info"])?),
                "list keys",
            )
            .await?;

        let keys: GatewayKeys = response
            .json()
            .await
            .map_err(|err| dependency_error(err, "Cannot deserialize LiteLLM gateway keys."))?;
        Ok(keys.data)
    }

    /// Retrieves the usage snapshot of the key with the specified ID.
    pub async fn get_key_status(&self, key_id: &str) -> anyhow::Result<KeyStatus> {
        let response = self
            .send(
                self.api
                    .network
                    .http_client
                    .get(self.endpoint(&["key", "info", key_id])?),
                "get key info",
            )
            .await?;

        let status: RawKeyStatus = response.json().await.map_err(|err| {
            dependency_error(err, "Cannot deserialize LiteLLM gateway key info.")
        })?;
        Ok(status.into_key_status(key_id.to_string()))
    }

    /// Asks the gateway to issue a new key.
    pub async fn generate_key(
        &self,
        params: &GatewayKeyGenerateParams<'_>,
    ) -> anyhow::Result<GatewayGeneratedKey> {
        let response = self
            .send(
                self.api
                    .network
                    .http_client
                    .post(self.endpoint(&["key", "generate"])?)
                    .json(params),
                "generate key",
            )
            .await?;

        response
            .json()
            .await
            .map_err(|err| dependency_error(err, "Cannot deserialize LiteLLM gateway new key."))
    }

    /// Updates the key in the gateway.
    pub async fn update_key(&self, params: &GatewayKeyUpdateParams<'_>) -> anyhow::Result<()> {
        self.send(
            self.api
                .network
                .http_client
                .put(self.endpoint(&["key", "update"])?)
                .json(params),
            "update key",
        )
        .await?;

        Ok(())
    }

    /// Deletes the key from the gateway.
    pub async fn delete_key(&self, params: &GatewayKeyDeleteParams<'_>) -> anyhow::Result<()> {
        self.send(
            self.api
                .network
                .http_client
                .delete(self.endpoint(&["key", "delete"])?)
                .json(params),
            "delete key",
        )
        .await?;

        Ok(())
    }

    /// Checks whether the gateway is reachable and healthy.
    pub async fn health(&self) -> anyhow::Result<()> {
        self.send(
            self.api.network.http_client.get(self.endpoint(&["health"])?),
            "health check",
        )
        .await?;

        Ok(())
    }

    /// Reports the gateway configuration along with the result of the health check. The health
    /// check is skipped if the integration is disabled or not configured.
    pub async fn connection_status(&self) -> ConnectionStatus {
        let config = &self.api.config.gateway;
        let connected = if config.active_master_key().is_some() {
            match self.health().await {
                Ok(()) => true,
                Err(err) => {
                    warn!("LiteLLM gateway connection check failed: {err:?}");
                    false
                }
            }
        } else {
            false
        };

        ConnectionStatus {
            connected,
            base_url: config.url.to_string(),
            enabled: config.enabled,
            master_key_configured: config
                .master_key
                .as_deref()
                .is_some_and(|master_key| !master_key.is_empty()),
        }
    }

    fn master_key(&self) -> Result<&'a str, LiteLlmKeysError> {
        let config = &self.api.config.gateway;
        if !config.enabled {
            return Err(LiteLlmKeysError::not_configured(
                "LiteLLM integration is disabled.",
            ));
        }

        config.active_master_key().ok_or_else(|| {
            LiteLlmKeysError::not_configured("LiteLLM master API key is not configured.")
        })
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let base_url = &self.api.config.gateway.url;
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("LiteLLM gateway URL cannot be a base: {base_url}."))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> anyhow::Result<Response> {
        let response = request
            .bearer_auth(self.master_key()?)
            .send()
            .await
            .map_err(|err| {
                dependency_error(err, format!("LiteLLM gateway is unreachable ({action})."))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = error_detail(response).await;
        if status == StatusCode::NOT_FOUND {
            bail!(LiteLlmKeysError::not_found(format!(
                "LiteLLM gateway couldn't find the requested resource ({action}): {detail}"
            )));
        }

        if status.is_client_error() {
            bail!(LiteLlmKeysError::client_with_root_cause(
                anyhow!("{status}").context(format!(
                    "LiteLLM gateway rejected the request ({action}): {detail}"
                ))
            ));
        }

        bail!(LiteLlmKeysError::dependency_unavailable(
            anyhow!("{status}: {detail}")
                .context(format!("LiteLLM gateway failed to {action}.")),
        ))
    }
}

/// Extracts the error message from the gateway response, falling back to the raw body and then
/// to the HTTP status.
async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            [
                value.get("detail"),
                value.pointer("/error/message"),
                value.get("message"),
            ]
            .into_iter()
            .flatten()
            .find_map(|message| message.as_str().map(str::to_string))
        })
        .or_else(|| Some(body.trim().to_string()).filter(|body| !body.is_empty()))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn dependency_error<E, C>(err: E, context: C) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
    C: std::fmt::Display + Send + Sync + 'static,
{
    LiteLlmKeysError::dependency_unavailable(anyhow::Error::new(err).context(context)).into()
}

impl Api {
    /// Returns an API to work with the LiteLLM gateway.
    pub fn gateway(&self) -> GatewayApi<'_> {
        GatewayApi::new(self)
    }
}
