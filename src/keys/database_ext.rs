use crate::{
    database::Database,
    error::Error as LiteLlmKeysError,
    keys::StoredLiteLlmKey,
    users::UserId,
};
use anyhow::bail;
use serde_json::Value;
use sqlx::{FromRow, query, query_as, query_scalar, types::Json};
use std::collections::BTreeSet;
use time::OffsetDateTime;

const KEY_COLUMNS: &str = "id, user_id, key_name, api_key, key_type, group_ids, is_active, \
description, metadata, created_at, updated_at, last_used_at";

#[derive(FromRow, Debug)]
struct RawLiteLlmKey {
    id: String,
    user_id: String,
    key_name: String,
    api_key: Vec<u8>,
    key_type: String,
    group_ids: Json<Vec<String>>,
    is_active: bool,
    description: Option<String>,
    metadata: Option<Json<Value>>,
    created_at: i64,
    updated_at: i64,
    last_used_at: Option<i64>,
}

impl TryFrom<RawLiteLlmKey> for StoredLiteLlmKey {
    type Error = anyhow::Error;

    fn try_from(raw: RawLiteLlmKey) -> Result<Self, Self::Error> {
        Ok(StoredLiteLlmKey {
            id: raw.id,
            user_id: UserId::new(raw.user_id)?,
            key_name: raw.key_name,
            api_key: raw.api_key,
            key_type: raw.key_type,
            group_ids: raw.group_ids.0,
            is_active: raw.is_active,
            description: raw.description,
            metadata: raw.metadata.map(|metadata| metadata.0),
            created_at: OffsetDateTime::from_unix_timestamp(raw.created_at)?,
            updated_at: OffsetDateTime::from_unix_timestamp(raw.updated_at)?,
            last_used_at: raw
                .last_used_at
                .map(OffsetDateTime::from_unix_timestamp)
                .transpose()?,
        })
    }
}

/// Extends the primary database with the LiteLLM keys related methods.
impl Database {
    /// Retrieves the key with the specified ID.
    pub async fn get_litellm_key(&self, id: &str) -> anyhow::Result<Option<StoredLiteLlmKey>> {
        query_as::<_, RawLiteLlmKey>(&format!(
            "SELECT {KEY_COLUMNS} FROM litellm_keys WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(StoredLiteLlmKey::try_from)
        .transpose()
    }

    /// Retrieves a page of the keys owned by the specified user, newest first.
    pub async fn get_user_litellm_keys(
        &self,
        user_id: &UserId,
        skip: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredLiteLlmKey>> {
        query_as::<_, RawLiteLlmKey>(&format!(
            r#"
SELECT {KEY_COLUMNS} FROM litellm_keys
WHERE user_id = ?1
ORDER BY created_at DESC, id DESC
LIMIT ?2 OFFSET ?3
            "#
        ))
        .bind(&**user_id)
        .bind(to_sql_int(limit))
        .bind(to_sql_int(skip))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(StoredLiteLlmKey::try_from)
        .collect()
    }

    /// Counts the keys owned by the specified user.
    pub async fn count_user_litellm_keys(&self, user_id: &UserId) -> anyhow::Result<usize> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM litellm_keys WHERE user_id = ?1")
            .bind(&**user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count)?)
    }

    /// Retrieves a page of all keys regardless of the owner, newest first.
    pub async fn get_all_litellm_keys(
        &self,
        skip: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredLiteLlmKey>> {
        query_as::<_, RawLiteLlmKey>(&format!(
            r#"
SELECT {KEY_COLUMNS} FROM litellm_keys
ORDER BY created_at DESC, id DESC
LIMIT ?1 OFFSET ?2
            "#
        ))
        .bind(to_sql_int(limit))
        .bind(to_sql_int(skip))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(StoredLiteLlmKey::try_from)
        .collect()
    }

    /// Counts all keys regardless of the owner.
    pub async fn count_litellm_keys(&self) -> anyhow::Result<usize> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM litellm_keys")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count)?)
    }

    /// Retrieves active keys that aren't owned by the specified user, but are shared with at
    /// least one of the specified groups, newest first.
    pub async fn get_shared_litellm_keys(
        &self,
        user_id: &UserId,
        groups: &BTreeSet<String>,
    ) -> anyhow::Result<Vec<StoredLiteLlmKey>> {
        if groups.is_empty() {
            return Ok(vec![]);
        }

        query_as::<_, RawLiteLlmKey>(&format!(
            r#"
SELECT {KEY_COLUMNS} FROM litellm_keys
WHERE user_id != ?1 AND is_active = 1 AND EXISTS (
    SELECT 1 FROM json_each(litellm_keys.group_ids) AS key_group
    WHERE key_group.value IN (SELECT value FROM json_each(?2))
)
ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(&**user_id)
        .bind(Json(groups))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(StoredLiteLlmKey::try_from)
        .collect()
    }

    /// Inserts a new key. Fails with a conflict error if the owner already has a key with the
    /// same name.
    pub async fn insert_litellm_key(&self, key: &StoredLiteLlmKey) -> anyhow::Result<()> {
        let result = query(
            r#"
INSERT INTO litellm_keys (id, user_id, key_name, api_key, key_type, group_ids, is_active,
                          description, metadata, created_at, updated_at, last_used_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&key.id)
        .bind(&*key.user_id)
        .bind(&key.key_name)
        .bind(&key.api_key)
        .bind(&key.key_type)
        .bind(Json(&key.group_ids))
        .bind(key.is_active)
        .bind(&key.description)
        .bind(key.metadata.as_ref().map(Json))
        .bind(key.created_at.unix_timestamp())
        .bind(key.updated_at.unix_timestamp())
        .bind(key.last_used_at.map(|at| at.unix_timestamp()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => handle_key_name_conflict(err, &key.key_name),
        }
    }

    /// Updates every mutable field of the key. Returns `false` if the key doesn't exist.
    pub async fn update_litellm_key(&self, key: &StoredLiteLlmKey) -> anyhow::Result<bool> {
        let result = query(
            r#"
UPDATE litellm_keys
SET key_name = ?2, api_key = ?3, key_type = ?4, group_ids = ?5, is_active = ?6,
    description = ?7, metadata = ?8, updated_at = ?9, last_used_at = ?10
WHERE id = ?1
            "#,
        )
        .bind(&key.id)
        .bind(&key.key_name)
        .bind(&key.api_key)
        .bind(&key.key_type)
        .bind(Json(&key.group_ids))
        .bind(key.is_active)
        .bind(&key.description)
        .bind(key.metadata.as_ref().map(Json))
        .bind(key.updated_at.unix_timestamp())
        .bind(key.last_used_at.map(|at| at.unix_timestamp()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(err) => handle_key_name_conflict(err, &key.key_name),
        }
    }

    /// Removes the key with the specified ID. Returns `false` if the key doesn't exist.
    pub async fn remove_litellm_key(&self, id: &str) -> anyhow::Result<bool> {
        let result = query("DELETE FROM litellm_keys WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn handle_key_name_conflict<T>(err: sqlx::Error, key_name: &str) -> anyhow::Result<T> {
    if let Some(db_err) = err.as_database_error()
        && db_err.is_unique_violation()
    {
        bail!(LiteLlmKeysError::conflict(format!(
            "Key with name '{key_name}' already exists."
        )));
    }

    Err(err.into())
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
