use crate::{
    api::Api,
    error::Error as LiteLlmKeysError,
    security::{host_group::HostGroup, host_user::HostUser},
    users::{Caller, UserId},
};
use anyhow::{Context, anyhow};
use reqwest::StatusCode;
use std::collections::BTreeSet;
use tracing::{error, warn};
use url::Url;

/// Resolves the callers of the service through the host platform.
pub struct SecurityApiExt<'a> {
    api: &'a Api,
}

impl<'a> SecurityApiExt<'a> {
    /// Instantiates security API extension.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Authenticates the bearer token with the host platform and resolves the caller's role and
    /// groups. Returns `None` if the host doesn't recognize the token.
    pub async fn authenticate(&self, token: &str) -> anyhow::Result<Option<Caller>> {
        let Some(user) = self.get_user(token).await? else {
            return Ok(None);
        };

        let id = match UserId::new(user.id) {
            Ok(id) => id,
            Err(err) => {
                warn!("Host platform returned a user without ID: {err}");
                return Ok(None);
            }
        };

        // Without groups the caller only loses access to shared keys, never gains any.
        let groups = match self.get_groups(token).await {
            Ok(groups) => groups
                .into_iter()
                .filter(|group| group.has_member(&id))
                .map(|group| group.id)
                .collect(),
            Err(err) => {
                warn!(user.id = %id, "Cannot retrieve user groups from the host platform: {err:?}");
                BTreeSet::new()
            }
        };

        Ok(Some(Caller {
            id,
            role: user.role,
            groups,
        }))
    }

    async fn get_user(&self, token: &str) -> anyhow::Result<Option<HostUser>> {
        let url = self.endpoint(&["api", "v1", "auths", ""])?;
        let response = self
            .api
            .network
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| {
                error!("Cannot reach the host platform: {err:?}");
                LiteLlmKeysError::dependency_unavailable(
                    anyhow!(err).context("Host platform is unreachable."),
                )
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!("Host platform couldn't authenticate the request ({status}).");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Host platform authentication failed with the status code `{status}` and body: {body}");
            return Err(LiteLlmKeysError::dependency_unavailable(
                anyhow!("{status}").context("Host platform failed to authenticate the user."),
            )
            .into());
        }

        Ok(Some(response.json::<HostUser>().await.with_context(
            || "Cannot parse the user returned by the host platform.",
        )?))
    }

    async fn get_groups(&self, token: &str) -> anyhow::Result<Vec<HostGroup>> {
        let url = self.endpoint(&["api", "v1", "groups", ""])?;
        Ok(self
            .api
            .network
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<HostGroup>>()
            .await?)
    }

    /// Appends path segments to the host URL, keeping any base path it's mounted under.
    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let base_url = &self.api.config.host.url;
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Host platform URL cannot be a base: {base_url}."))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Api {
    /// Returns an API to work with security related tasks.
    pub fn security(&self) -> SecurityApiExt<'_> {
        SecurityApiExt::new(self)
    }
}
