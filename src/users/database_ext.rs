use crate::{database::Database, users::Caller};
use sqlx::query;
use time::OffsetDateTime;

/// Extends the primary database with the users related methods.
impl Database {
    /// Inserts the user into the `users` table or refreshes its role if it's already known.
    pub async fn upsert_user(&self, caller: &Caller) -> anyhow::Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        query(
            r#"
INSERT INTO users (id, role, created_at, updated_at)
VALUES (?1, ?2, ?3, ?3)
ON CONFLICT(id) DO UPDATE SET role = excluded.role, updated_at = excluded.updated_at
            "#,
        )
        .bind(&*caller.id)
        .bind(caller.role.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
