//! PostgreSQL storage backend
//!
//! Entities live one table per type, serialized into a JSONB column and
//! keyed by their storage key. `created_at` drives listing order.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;
use crate::domain::storage::{Storage, StorageEntity, StorageKey};

/// Connection settings for the PostgreSQL backend
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/genstack".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table: String,
    marker: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table", &self.table)
            .finish()
    }
}

fn db_error(operation: &str, error: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("{} failed: {}", operation, error))
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Wrap an existing pool. The table name is trusted input; it comes
    /// from our own wiring, never from callers.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            marker: PhantomData,
        }
    }

    /// Open a fresh pool from config and wrap it
    pub async fn connect(
        config: &PostgresConfig,
        table: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| db_error("connect", e))?;

        Ok(Self::new(pool, table))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the backing table when it does not exist yet
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                 key VARCHAR(255) PRIMARY KEY, \
                 data JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
                 updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\
             )",
            self.table
        );

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("ensure_table", e))?;

        Ok(())
    }

    fn encode(entity: &E) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(entity).map_err(|e| db_error("serialize", e))
    }

    fn decode(data: serde_json::Value) -> Result<E, DomainError> {
        serde_json::from_value(data).map_err(|e| db_error("deserialize", e))
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let sql = format!("SELECT data FROM {} WHERE key = $1", self.table);

        sqlx::query(&sql)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get", e))?
            .map(|row| Self::decode(row.get("data")))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let sql = format!("SELECT data FROM {} ORDER BY created_at", self.table);

        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list", e))?
            .into_iter()
            .map(|row| Self::decode(row.get("data")))
            .collect()
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = Self::encode(&entity)?;
        let sql = format!("INSERT INTO {} (key, data) VALUES ($1, $2)", self.table);

        sqlx::query(&sql)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::conflict(format!("Entity with key '{}' already exists", key))
                }
                _ => db_error("create", e),
            })?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = Self::encode(&entity)?;
        let sql = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE key = $1",
            self.table
        );

        let outcome = sqlx::query(&sql)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update", e))?;

        if outcome.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let sql = format!("DELETE FROM {} WHERE key = $1", self.table);

        let outcome = sqlx::query(&sql)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete", e))?;

        Ok(outcome.rows_affected() > 0)
    }

    // One statement, so a failure removes nothing
    async fn delete_batch(&self, keys: &[E::Key]) -> Result<usize, DomainError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let keys: Vec<String> = keys.iter().map(|k| k.as_str().to_string()).collect();
        let sql = format!("DELETE FROM {} WHERE key = ANY($1)", self.table);

        let outcome = sqlx::query(&sql)
            .bind(&keys)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_batch", e))?;

        Ok(outcome.rows_affected() as usize)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE key = $1)",
            self.table
        );

        sqlx::query_scalar(&sql)
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("exists", e))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count", e))?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_config_builders() {
        let config = PostgresConfig::new("postgres://localhost/test")
            .with_max_connections(4)
            .with_connect_timeout(5);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout_secs, 5);
    }
}
