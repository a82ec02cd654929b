use crate::{
    api::Api,
    error::Error as LiteLlmKeysError,
    keys::{
        ApiKeyEncryption, KeysPageParams, LiteLlmKey, LiteLlmKeyCreateParams,
        LiteLlmKeyUpdateParams, LiteLlmKeysPage, StoredLiteLlmKey, ensure_group_membership,
        ensure_readable, ensure_writable, mask_api_key,
    },
    users::Caller,
};
use anyhow::{Context, bail};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

/// Prefix of the generated secrets.
const GENERATED_API_KEY_PREFIX: &str = "sk-";
/// Number of random bytes in the generated secrets.
const GENERATED_API_KEY_BYTES: usize = 24;

/// API to manage LiteLLM keys persisted in the local database. Secrets are encrypted at rest and
/// are only decrypted to be masked, except for the response to the key creation.
pub struct KeysApiExt<'a, 'c> {
    api: &'a Api,
    caller: &'c Caller,
}

impl<'a, 'c> KeysApiExt<'a, 'c> {
    /// Creates LiteLLM keys API.
    pub fn new(api: &'a Api, caller: &'c Caller) -> Self {
        Self { api, caller }
    }

    /// Creates a new key owned by the caller. The returned key carries the plain secret.
    pub async fn create(&self, params: LiteLlmKeyCreateParams) -> anyhow::Result<LiteLlmKey> {
        params.validate()?;

        let group_ids = params.group_ids();
        ensure_group_membership(self.caller, &group_ids)?;

        let encryption = self.encryption()?;
        let key_type = params.key_type().to_string();
        let api_key = match params.api_key {
            Some(api_key) => api_key,
            None => generate_api_key()?,
        };

        let now = now_utc()?;
        let key = StoredLiteLlmKey {
            id: Uuid::now_v7().to_string(),
            user_id: self.caller.id.clone(),
            key_name: params.key_name,
            api_key: encryption.encrypt(&api_key)?,
            key_type,
            group_ids,
            is_active: true,
            description: params.description,
            metadata: params.metadata,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        };

        self.api.db.upsert_user(self.caller).await?;
        self.api.db.insert_litellm_key(&key).await?;

        info!(user.id = %self.caller.id, key.id = %key.id, "Created LiteLLM key.");

        Ok(key.into_litellm_key(api_key, self.caller))
    }

    /// Returns a page of the keys owned by the caller.
    pub async fn list_owned(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        page.validate()?;

        let encryption = self.encryption()?;
        let keys = self
            .api
            .db
            .get_user_litellm_keys(&self.caller.id, page.skip, page.limit)
            .await?;
        let total = self.api.db.count_user_litellm_keys(&self.caller.id).await?;

        Ok(LiteLlmKeysPage {
            keys: self.mask_all(keys, &encryption)?,
            total,
        })
    }

    /// Returns active keys of other users shared with at least one of the caller's groups.
    pub async fn list_accessible(&self) -> anyhow::Result<LiteLlmKeysPage> {
        let encryption = self.encryption()?;
        let keys = self
            .api
            .db
            .get_shared_litellm_keys(&self.caller.id, &self.caller.groups)
            .await?;

        let keys = self.mask_all(keys, &encryption)?;
        Ok(LiteLlmKeysPage {
            total: keys.len(),
            keys,
        })
    }

    /// Returns a page of all keys, only available to administrators.
    pub async fn list_all(&self, page: KeysPageParams) -> anyhow::Result<LiteLlmKeysPage> {
        if !self.caller.is_admin() {
            bail!(LiteLlmKeysError::access_forbidden());
        }

        page.validate()?;

        let encryption = self.encryption()?;
        let keys = self
            .api
            .db
            .get_all_litellm_keys(page.skip, page.limit)
            .await?;
        let total = self.api.db.count_litellm_keys().await?;

        Ok(LiteLlmKeysPage {
            keys: self.mask_all(keys, &encryption)?,
            total,
        })
    }

    /// Returns the key with the masked secret if the caller can see it.
    pub async fn get(&self, id: &str) -> anyhow::Result<LiteLlmKey> {
        let encryption = self.encryption()?;
        let key = self.mask(self.get_stored(id).await?, &encryption)?;
        ensure_readable(self.caller, &key)?;

        Ok(key)
    }

    /// Applies the partial update to the key if the caller can modify it.
    pub async fn update(
        &self,
        id: &str,
        params: LiteLlmKeyUpdateParams,
    ) -> anyhow::Result<LiteLlmKey> {
        params.validate()?;

        let encryption = self.encryption()?;
        let mut key = self.get_stored(id).await?;
        let existing_key = self.mask(key.clone(), &encryption)?;
        ensure_writable(self.caller, &existing_key)?;

        let group_ids = params.group_ids();
        if let Some(ref group_ids) = group_ids {
            ensure_group_membership(self.caller, group_ids)?;
        }

        let masked_api_key = match params.api_key {
            Some(ref api_key) => {
                key.api_key = encryption.encrypt(api_key)?;
                mask_api_key(api_key)
            }
            None => existing_key.api_key,
        };

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
            key.metadata = Some(metadata);
        }
        key.updated_at = now_utc()?;

        if !self.api.db.update_litellm_key(&key).await? {
            bail!(not_found(id));
        }

        info!(user.id = %self.caller.id, key.id = %key.id, "Updated LiteLLM key.");

        Ok(key.into_litellm_key(masked_api_key, self.caller))
    }

    /// Deletes the key if the caller can modify it.
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let encryption = self.encryption()?;
        let key = self.mask(self.get_stored(id).await?, &encryption)?;
        ensure_writable(self.caller, &key)?;

        if !self.api.db.remove_litellm_key(id).await? {
            bail!(not_found(id));
        }

        info!(user.id = %self.caller.id, key.id = %id, "Deleted LiteLLM key.");

        Ok(())
    }

    async fn get_stored(&self, id: &str) -> anyhow::Result<StoredLiteLlmKey> {
        match self.api.db.get_litellm_key(id).await? {
            Some(key) => Ok(key),
            None => bail!(not_found(id)),
        }
    }

    fn mask(
        &self,
        key: StoredLiteLlmKey,
        encryption: &ApiKeyEncryption,
    ) -> anyhow::Result<LiteLlmKey> {
        let api_key = encryption
            .decrypt(&key.api_key)
            .with_context(|| format!("Cannot decrypt LiteLLM key ('{}').", key.id))?;
        Ok(key.into_litellm_key(mask_api_key(&api_key), self.caller))
    }

    fn mask_all(
        &self,
        keys: Vec<StoredLiteLlmKey>,
        encryption: &ApiKeyEncryption,
    ) -> anyhow::Result<Vec<LiteLlmKey>> {
        keys.into_iter()
            .map(|key| self.mask(key, encryption))
            .collect()
    }

    fn encryption(&self) -> anyhow::Result<ApiKeyEncryption> {
        let Some(ref hex_key) = self.api.config.security.secrets_encryption_key else {
            bail!(LiteLlmKeysError::not_configured(
                "API key encryption is not configured."
            ));
        };

        ApiKeyEncryption::new(hex_key).map_err(|err| {
            LiteLlmKeysError::not_configured(format!("API key encryption is misconfigured: {err}"))
                .into()
        })
    }
}

/// Generates a new random secret, e.g. `sk-5f0c...`.
fn generate_api_key() -> anyhow::Result<String> {
    let mut bytes = [0u8; GENERATED_API_KEY_BYTES];
    openssl::rand::rand_bytes(&mut bytes).with_context(|| "Failed to generate API key.")?;
    Ok(format!("{GENERATED_API_KEY_PREFIX}{}", hex::encode(bytes)))
}

/// Returns the current time truncated to whole seconds, the precision keys are stored with.
fn now_utc() -> anyhow::Result<OffsetDateTime> {
    Ok(OffsetDateTime::now_utc().replace_nanosecond(0)?)
}

fn not_found(id: &str) -> LiteLlmKeysError {
    LiteLlmKeysError::not_found(format!("LiteLLM key ('{id}') not found."))
}

impl Api {
    /// Returns an API to manage LiteLLM keys persisted in the local database.
    pub fn storage_keys<'a, 'c>(&'a self, caller: &'c Caller) -> KeysApiExt<'a, 'c> {
        KeysApiExt::new(self, caller)
    }
}

#[cfg(test)]
mod tests {
    use super::generate_api_key;
    use crate::{
        error::{Error as LiteLlmKeysError, ErrorKind},
        keys::{KeysPageParams, LiteLlmKeyCreateParams, LiteLlmKeyUpdateParams},
        tests::{mock_api, mock_api_with_config, mock_caller, mock_config},
        users::UserRole,
    };
    use serde_json::json;

    fn create_params(key_name: &str, api_key: &str, groups: &[&str]) -> LiteLlmKeyCreateParams {
        LiteLlmKeyCreateParams {
            key_name: key_name.to_string(),
            api_key: Some(api_key.to_string()),
            group_ids: Some(groups.iter().map(|group| group.to_string()).collect()),
            ..Default::default()
        }
    }

    fn error_kind(err: anyhow::Error) -> ErrorKind {
        LiteLlmKeysError::from(err).kind()
    }

    #[test]
    fn generates_api_keys() -> anyhow::Result<()> {
        let one = generate_api_key()?;
        let two = generate_api_key()?;
        assert!(one.starts_with("sk-"));
        assert_eq!(one.len(), 3 + 48);
        assert_ne!(one, two);
        Ok(())
    }

    #[tokio::test]
    async fn returns_plain_secret_only_on_creation() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &["g1"])?;
        let keys = api.storage_keys(&owner);

        let created = keys
            .create(create_params("prod", "sk-abcdefghijklmnopqrstuvwxyz", &["g1"]))
            .await?;
        assert_eq!(created.api_key, "sk-abcdefghijklmnopqrstuvwxyz");
        assert_eq!(created.key_type, "api_key");
        assert_eq!(created.group_ids, vec!["g1".to_string()]);
        assert!(created.is_active);
        assert!(!created.is_shared);

        let key = keys.get(&created.id).await?;
        assert_eq!(key.api_key, "sk-abcde*****************wxyz");
        assert_eq!(key.created_at, created.created_at);

        let page = keys.list_owned(KeysPageParams::default()).await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.keys, vec![key]);

        Ok(())
    }

    #[tokio::test]
    async fn generates_secret_if_not_provided() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &[])?;

        let created = api
            .storage_keys(&owner)
            .create(LiteLlmKeyCreateParams {
                key_name: "generated".to_string(),
                ..Default::default()
            })
            .await?;
        assert!(created.api_key.starts_with("sk-"));
        assert_eq!(created.api_key.len(), 51);

        Ok(())
    }

    #[tokio::test]
    async fn shares_keys_with_group_members_for_reading_only() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &["g1"])?;
        let member = mock_caller("member", UserRole::User, &["g1"])?;
        let stranger = mock_caller("stranger", UserRole::User, &["g2"])?;

        let created = api
            .storage_keys(&owner)
            .create(create_params("prod", "sk-abcdefghijklmnopqrstuvwxyz", &["g1"]))
            .await?;

        let shared = api.storage_keys(&member).get(&created.id).await?;
        assert!(shared.is_shared);
        assert_eq!(shared.api_key, "sk-abcde*****************wxyz");

        let accessible = api.storage_keys(&member).list_accessible().await?;
        assert_eq!(accessible.total, 1);
        assert_eq!(accessible.keys, vec![shared]);

        // Owner doesn't see own keys among accessible ones.
        assert_eq!(api.storage_keys(&owner).list_accessible().await?.total, 0);

        let update = LiteLlmKeyUpdateParams {
            key_name: Some("hijacked".to_string()),
            ..Default::default()
        };
        assert_eq!(
            error_kind(
                api.storage_keys(&member)
                    .update(&created.id, update.clone())
                    .await
                    .unwrap_err()
            ),
            ErrorKind::AccessForbidden
        );
        assert_eq!(
            error_kind(api.storage_keys(&member).delete(&created.id).await.unwrap_err()),
            ErrorKind::AccessForbidden
        );

        assert_eq!(
            error_kind(api.storage_keys(&stranger).get(&created.id).await.unwrap_err()),
            ErrorKind::NotFound
        );
        assert_eq!(
            error_kind(
                api.storage_keys(&stranger)
                    .update(&created.id, update)
                    .await
                    .unwrap_err()
            ),
            ErrorKind::AccessForbidden
        );

        // The key is intact.
        assert_eq!(api.storage_keys(&owner).get(&created.id).await?.key_name, "prod");

        Ok(())
    }

    #[tokio::test]
    async fn admins_can_manage_any_key() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &[])?;
        let admin = mock_caller("admin", UserRole::Admin, &[])?;

        let created = api
            .storage_keys(&owner)
            .create(create_params("prod", "sk-1234", &[]))
            .await?;

        let all = api.storage_keys(&admin).list_all(KeysPageParams::default()).await?;
        assert_eq!(all.total, 1);
        assert_eq!(all.keys[0].api_key, "*******");
        assert!(all.keys[0].is_shared);

        assert_eq!(
            error_kind(
                api.storage_keys(&owner)
                    .list_all(KeysPageParams::default())
                    .await
                    .unwrap_err()
            ),
            ErrorKind::AccessForbidden
        );

        let updated = api
            .storage_keys(&admin)
            .update(
                &created.id,
                LiteLlmKeyUpdateParams {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        assert!(!updated.is_active);
        assert_eq!(updated.user_id, owner.id);

        api.storage_keys(&admin).delete(&created.id).await?;
        assert_eq!(
            error_kind(api.storage_keys(&owner).get(&created.id).await.unwrap_err()),
            ErrorKind::NotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn can_update_keys() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &["g1", "g2"])?;
        let keys = api.storage_keys(&owner);

        let created = keys
            .create(create_params("prod", "sk-abcdefghijklmnopqrstuvwxyz", &["g1"]))
            .await?;

        let updated = keys
            .update(
                &created.id,
                LiteLlmKeyUpdateParams {
                    key_name: Some("staging".to_string()),
                    group_ids: Some(vec!["g2".to_string()]),
                    description: Some("Staging key".to_string()),
                    metadata: Some(json!({ "team": "ml" })),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(updated.key_name, "staging");
        assert_eq!(updated.group_ids, vec!["g2".to_string()]);
        assert_eq!(updated.description.as_deref(), Some("Staging key"));
        assert_eq!(updated.metadata, Some(json!({ "team": "ml" })));
        assert_eq!(updated.api_key, "sk-abcde*****************wxyz");
        assert_eq!(keys.get(&created.id).await?, updated);

        let updated = keys
            .update(
                &created.id,
                LiteLlmKeyUpdateParams {
                    api_key: Some("sk-zyxwvutsrqponmlkjihgfedcba".to_string()),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(updated.api_key, "sk-zyxwv*****************dcba");
        assert_eq!(keys.get(&created.id).await?.api_key, updated.api_key);

        // Keys can't be shared with groups the caller isn't a member of.
        assert_eq!(
            error_kind(
                keys.update(
                    &created.id,
                    LiteLlmKeyUpdateParams {
                        group_ids: Some(vec!["g3".to_string()]),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err()
            ),
            ErrorKind::ClientError
        );

        Ok(())
    }

    #[tokio::test]
    async fn validates_input() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &["g1"])?;
        let keys = api.storage_keys(&owner);

        assert_eq!(
            error_kind(keys.create(create_params("", "sk-1234", &[])).await.unwrap_err()),
            ErrorKind::ClientError
        );
        assert_eq!(
            error_kind(
                keys.create(create_params("prod", "sk-1234", &["g2"]))
                    .await
                    .unwrap_err()
            ),
            ErrorKind::ClientError
        );

        keys.create(create_params("prod", "sk-1234", &[])).await?;
        assert_eq!(
            error_kind(
                keys.create(create_params("prod", "sk-5678", &[]))
                    .await
                    .unwrap_err()
            ),
            ErrorKind::Conflict
        );

        assert_eq!(
            error_kind(
                keys.list_owned(KeysPageParams { skip: 0, limit: 0 })
                    .await
                    .unwrap_err()
            ),
            ErrorKind::ClientError
        );

        assert_eq!(
            error_kind(
                keys.update("unknown", LiteLlmKeyUpdateParams::default())
                    .await
                    .unwrap_err()
            ),
            ErrorKind::ClientError
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_keys_are_gone() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &[])?;
        let keys = api.storage_keys(&owner);

        let created = keys.create(create_params("prod", "sk-1234", &[])).await?;
        keys.delete(&created.id).await?;

        assert_eq!(
            error_kind(keys.delete(&created.id).await.unwrap_err()),
            ErrorKind::NotFound
        );
        assert_eq!(
            error_kind(keys.get(&created.id).await.unwrap_err()),
            ErrorKind::NotFound
        );
        assert_eq!(keys.list_owned(KeysPageParams::default()).await?.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn paginates_owned_keys() -> anyhow::Result<()> {
        let api = mock_api().await?;
        let owner = mock_caller("owner", UserRole::User, &[])?;
        let keys = api.storage_keys(&owner);

        for index in 0..3 {
            keys.create(create_params(&format!("key-{index}"), "sk-1234", &[]))
                .await?;
        }

        let page = keys.list_owned(KeysPageParams { skip: 1, limit: 1 }).await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.keys.len(), 1);

        let page = keys
            .list_owned(KeysPageParams { skip: 3, limit: 10 })
            .await?;
        assert_eq!(page.total, 3);
        assert!(page.keys.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn fails_closed_without_encryption_key() -> anyhow::Result<()> {
        let mut config = mock_config()?;
        config.security.secrets_encryption_key = None;

        let api = mock_api_with_config(config).await?;
        let owner = mock_caller("owner", UserRole::User, &[])?;
        let keys = api.storage_keys(&owner);

        assert_eq!(
            error_kind(keys.create(create_params("prod", "sk-1234", &[])).await.unwrap_err()),
            ErrorKind::NotConfigured
        );
        assert_eq!(
            error_kind(keys.list_owned(KeysPageParams::default()).await.unwrap_err()),
            ErrorKind::NotConfigured
        );
        assert_eq!(
            error_kind(keys.delete("key-1").await.unwrap_err()),
            ErrorKind::NotConfigured
        );

        let mut config = mock_config()?;
        config.security.secrets_encryption_key = Some("not-hex".to_string());
        let api = mock_api_with_config(config).await?;
        assert_eq!(
            error_kind(api.storage_keys(&owner).list_accessible().await.unwrap_err()),
            ErrorKind::NotConfigured
        );

        Ok(())
    }
}
