use crate::{
    api::Api,
    config::KeysBackend,
    error::Error as LiteLlmKeysError,
    gateway::{GatewayKeysApiExt, KeyStatus},
    keys::{
        KeysApiExt, KeysPageParams, LiteLlmKey, LiteLlmKeyCreateParams, LiteLlmKeyUpdateParams,
        LiteLlmKeysPage,
    },
    users::Caller,
};
use anyhow::bail;

/// Key operations available to the REST surface, regardless of where the records live.
pub enum KeyStore<'a, 'c> {
    Storage(KeysApiExt<'a, 'c>),
    Gateway(GatewayKeysApiExt<'a, 'c>),
}

impl KeyStore<'_, '_> {
    pub async fn create(&self, params: LiteLlmKeyCreateParams) -> anyhow::Result<LiteLlmKey> {
        match self {
            Self::Storage(keys) => keys.create(params).await,
            Self::Gateway(keys) => keys.create(params).await,
        }
    }

    pub async fn list_owned(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        match self {
            Self::Storage(keys) => keys.list_owned(page).await,
            Self::Gateway(keys) => keys.list_owned(page).await,
        }
    }

    pub async fn list_accessible(&self) -> anyhow::Result<LiteLlmKeysPage> {
        match self {
            Self::Storage(keys) => keys.list_accessible().await,
            Self::Gateway(keys) => keys.list_accessible().await,
        }
    }

    pub async fn list_all(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        match self {
            Self::Storage(keys) => keys.list_all(page).await,
            Self::Gateway(keys) => keys.list_all(page).await,
        }
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<LiteLlmKey> {
        match self {
            Self::Storage(keys) => keys.get(id).await,
            Self::Gateway(keys) => keys.get(id).await,
        }
    }

    pub async fn update(
        &self,
        id: &str,
        params: LiteLlmKeyUpdateParams,
    ) -> anyhow::Result<LiteLlmKey> {
        match self {
            Self::Storage(keys) => keys.update(id, params).await,
            Self::Gateway(keys) => keys.update(id, params).await,
        }
    }

    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        match self {
            Self::Storage(keys) => keys.delete(id).await,
            Self::Gateway(keys) => keys.delete(id).await,
        }
    }

    /// Usage snapshots are only tracked by the gateway.
    pub async fn status(&self, id: &str) -> anyhow::Result<KeyStatus> {
        match self {
            Self::Storage(_) => bail!(LiteLlmKeysError::not_found(
                "Key status is only available for the LiteLLM gateway keys."
            )),
            Self::Gateway(keys) => keys.status(id).await,
        }
    }
}

impl Api {
    /// Returns key operations for the backend selected in the configuration.
    pub fn keys<'a, 'c>(&'a self, caller: &'c Caller) -> KeyStore<'a, 'c> {
        match self.config.keys.backend {
            KeysBackend::Storage => KeyStore::Storage(self.storage_keys(caller)),
            KeysBackend::Gateway => KeyStore::Gateway(self.gateway_keys(caller)),
        }
    }
}
