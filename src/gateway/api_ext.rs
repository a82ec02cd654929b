use crate::{
    api::Api,
    error::Error as LiteLlmKeysError,
    gateway::{
        ConnectionStatus, KeyStatus,
        gateway_key::{GatewayKeyDeleteParams, GatewayKeyGenerateParams, GatewayKeyUpdateParams},
    },
    keys::{
        KeysPageParams, LiteLlmKey, LiteLlmKeyCreateParams, LiteLlmKeyUpdateParams,
        LiteLlmKeysPage, ensure_group_membership, ensure_readable, ensure_writable,
    },
    users::Caller,
};
use anyhow::bail;
use serde_json::{Map, Value};
use std::cmp::Reverse;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Marker stored in the metadata of the keys issued through this service.
const CREATED_BY: &str = "litellm-keys";
const CREATED_BY_FIELD: &str = "created_by";

/// API to manage LiteLLM keys held by the gateway on behalf of the caller. The gateway trusts the
/// master credential, so every ownership and visibility rule is enforced here.
pub struct GatewayKeysApiExt<'a, 'c> {
    api: &'a Api,
    caller: &'c Caller,
}

impl<'a, 'c> GatewayKeysApiExt<'a, 'c> {
    /// Creates gateway-backed LiteLLM keys API.
    pub fn new(api: &'a Api, caller: &'c Caller) -> Self {
        Self { api, caller }
    }

    /// Asks the gateway to issue a new key owned by the caller. The returned key carries the
    /// plain secret issued by the gateway, it's never exposed again.
    pub async fn create(&self, params: LiteLlmKeyCreateParams) -> anyhow::Result<LiteLlmKey> {
        params.validate()?;
        if params.api_key.is_some() {
            bail!(LiteLlmKeysError::client(
                "LiteLLM gateway issues secrets itself, custom API keys aren't supported."
            ));
        }

        let group_ids = params.group_ids();
        ensure_group_membership(self.caller, &group_ids)?;

        let key_type = params.key_type().to_string();
        let mut metadata = match params.metadata {
            Some(Value::Object(metadata)) => metadata,
            _ => Map::new(),
        };
        metadata.insert(CREATED_BY_FIELD.to_string(), Value::from(CREATED_BY));
        let metadata = Value::Object(metadata);

        let generated = self
            .api
            .gateway()
            .generate_key(&GatewayKeyGenerateParams {
                user_id: &self.caller.id,
                key_name: &params.key_name,
                key_type: &key_type,
                groups: &group_ids,
                description: params.description.as_deref(),
                duration: None,
                models: vec![],
                max_budget: None,
                metadata: &metadata,
            })
            .await?;

        info!(user.id = %self.caller.id, key.id = %generated.key_id, "Created LiteLLM gateway key.");

        let now = OffsetDateTime::now_utc();
        Ok(LiteLlmKey {
            id: generated.key_id,
            user_id: self.caller.id.clone(),
            key_name: params.key_name,
            api_key: generated.key,
            key_type,
            group_ids,
            is_active: true,
            description: params.description,
            metadata: Some(metadata),
            created_at: now,
            updated_at: now,
            last_used_at: None,
            is_shared: false,
        })
    }

    /// Returns a page of the keys owned by the caller.
    pub async fn list_owned(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        page.validate()?;

        let keys = self
            .list_keys()
            .await?
            .into_iter()
            .filter(|key| key.user_id == self.caller.id)
            .collect::<Vec<_>>();

        Ok(LiteLlmKeysPage {
            total: keys.len(),
            keys: page.slice(keys),
        })
    }

    /// Returns active keys of other users shared with at least one of the caller's groups.
    pub async fn list_accessible(&self) -> anyhow::Result<LiteLlmKeysPage> {
        let keys = self
            .list_keys()
            .await?
            .into_iter()
            .filter(|key| {
                key.is_shared && key.is_active && self.caller.is_member_of_any(&key.group_ids)
            })
            .collect::<Vec<_>>();

        Ok(LiteLlmKeysPage {
            total: keys.len(),
            keys,
        })
    }

    /// Returns a page of all keys known to the gateway, only available to administrators.
    pub async fn list_all(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        if !self.caller.is_admin() {
            bail!(LiteLlmKeysError::access_forbidden());
        }

        page.validate()?;

        let keys = self.list_keys().await?;
        Ok(LiteLlmKeysPage {
            total: keys.len(),
            keys: page.slice(keys),
        })
    }

    /// Returns the key with the masked secret if the caller can see it.
    pub async fn get(&self, id: &str) -> anyhow::Result<LiteLlmKey> {
        let key = self.find_key(id).await?;
        ensure_readable(self.caller, &key)?;

        Ok(key)
    }

    /// Applies the partial update to the key if the caller can modify it. The secret itself
    /// can't be changed, the gateway only issues new ones.
    pub async fn update(
        &self,
        id: &str,
        params: LiteLlmKeyUpdateParams,
    ) -> anyhow::Result<LiteLlmKey> {
        params.validate()?;
        if params.api_key.is_some() {
            bail!(LiteLlmKeysError::client(
                "Secrets of the LiteLLM gateway keys cannot be updated."
            ));
        }

        let mut key = self.find_key(id).await?;
        ensure_writable(self.caller, &key)?;

        let group_ids = params.group_ids();
        if let Some(ref group_ids) = group_ids {
            ensure_group_membership(self.caller, group_ids)?;
        }

        if let Some(key_name) = params.key_name {
            key.key_name = key_name;
        }
        if let Some(key_type) = params.key_type {
            key.key_type = key_type;
        }
        if let Some(group_ids) = group_ids {
            key.group_ids = group_ids;
        }
        if let Some(is_active) = params.is_active {
            key.is_active = is_active;
        }
        if let Some(description) = params.description {
            key.description = Some(description);
        }
        if let Some(metadata) = params.metadata {
            // The marker survives metadata replacement.
            let created_by = key
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.get(CREATED_BY_FIELD))
                .cloned();
            key.metadata = Some(match (metadata, created_by) {
                (Value::Object(mut metadata), Some(created_by)) => {
                    metadata.insert(CREATED_BY_FIELD.to_string(), created_by);
                    Value::Object(metadata)
                }
                (metadata, _) => metadata,
            });
        }

        self.api
            .gateway()
            .update_key(&GatewayKeyUpdateParams {
                key_id: &key.id,
                user_id: &key.user_id,
                key_name: &key.key_name,
                key_type: &key.key_type,
                groups: &key.group_ids,
                is_active: key.is_active,
                description: key.description.as_deref(),
                metadata: key.metadata.as_ref(),
            })
            .await?;
        key.updated_at = OffsetDateTime::now_utc();

        info!(user.id = %self.caller.id, key.id = %key.id, "Updated LiteLLM gateway key.");

        Ok(key)
    }

    /// Deletes the key if the caller can modify it.
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let key = self.find_key(id).await?;
        ensure_writable(self.caller, &key)?;

        self.api
            .gateway()
            .delete_key(&GatewayKeyDeleteParams {
                key_id: &key.id,
                user_id: &key.user_id,
            })
            .await?;

        info!(user.id = %self.caller.id, key.id = %key.id, "Deleted LiteLLM gateway key.");

        Ok(())
    }

    /// Returns the usage snapshot of the key if the caller can see it.
    pub async fn status(&self, id: &str) -> anyhow::Result<KeyStatus> {
        let key = self.find_key(id).await?;
        ensure_readable(self.caller, &key)?;

        self.api.gateway().get_key_status(&key.id).await
    }

    /// Checks the connection to the gateway, only available to administrators.
    pub async fn connection_status(&self) -> anyhow::Result<ConnectionStatus> {
        if !self.caller.is_admin() {
            bail!(LiteLlmKeysError::access_forbidden());
        }

        Ok(self.api.gateway().connection_status().await)
    }

    /// Retrieves all keys managed through this service, newest first.
    async fn list_keys(&self) -> anyhow::Result<Vec<LiteLlmKey>> {
        let mut keys = Vec::new();
        for key in self.api.gateway().list_keys().await? {
            let key_id = key.id.clone();
            match key.into_litellm_key(self.caller) {
                Ok(Some(key)) => keys.push(key),
                Ok(None) => debug!(key.id = %key_id, "Skipping LiteLLM gateway key without owner."),
                Err(err) => {
                    warn!(key.id = %key_id, "Skipping malformed LiteLLM gateway key: {err:?}")
                }
            }
        }

        keys.sort_by_key(|key| Reverse((key.created_at, key.id.clone())));
        Ok(keys)
    }

    async fn find_key(&self, id: &str) -> anyhow::Result<LiteLlmKey> {
        match self.list_keys().await?.into_iter().find(|key| key.id == id) {
            Some(key) => Ok(key),
            None => bail!(LiteLlmKeysError::not_found(format!(
                "LiteLLM key ('{id}') not found."
            ))),
        }
    }
}

impl Api {
    /// Returns an API to manage LiteLLM keys held by the gateway.
    pub fn gateway_keys<'a, 'c>(&'a self, caller: &'c Caller) -> GatewayKeysApiExt<'a, 'c> {
        GatewayKeysApiExt::new(self, caller)
    }
}
