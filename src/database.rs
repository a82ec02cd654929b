use crate::config::DatabaseConfig;
use anyhow::Context;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: Pool<Sqlite>,
}

/// Common methods for the primary database, extensions are implemented separately in every module.
impl Database {
    /// Opens the database described by the config and applies pending migrations.
    pub async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid database URL: {}.", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| "Failed to connect to the database.")?;

        Self::create(pool).await
    }

    /// Wraps an existing pool and applies pending migrations.
    pub async fn create(pool: Pool<Sqlite>) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .with_context(|| "Failed to migrate database")?;

        Ok(Database { pool })
    }
}

impl AsRef<Database> for Database {
    fn as_ref(&self) -> &Self {
        self
    }
}
