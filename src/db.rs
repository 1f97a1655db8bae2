//! Linked item storage.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically
//! - Storing and looking up the access token of each linked item
//!
//! Without a configured database the store lives in process memory and is
//! lost on restart.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres};
use tokio::sync::RwLock;

use crate::{error::AppError, models::item::LinkedItem};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Configuration
///
/// - Maximum connections: 5
/// - Connections are created lazily as needed
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server
/// cannot be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each one runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Short SHA-256 fingerprint of a secret token, safe to log.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(12);
    digest
}

/// Where linked items are kept.
///
/// Cloning is cheap: both variants share their backing storage.
#[derive(Debug, Clone)]
pub enum ItemStore {
    Postgres(DbPool),
    Memory(Arc<RwLock<HashMap<String, LinkedItem>>>),
}

impl ItemStore {
    /// Empty store held in process memory.
    pub fn in_memory() -> Self {
        ItemStore::Memory(Arc::default())
    }

    /// Name of the backing store, reported by the health check.
    pub fn kind(&self) -> &'static str {
        match self {
            ItemStore::Postgres(_) => "postgres",
            ItemStore::Memory(_) => "memory",
        }
    }

    /// Insert or replace the access token of an item.
    pub async fn save_item(&self, item_id: &str, access_token: &str) -> Result<(), AppError> {
        match self {
            ItemStore::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO linked_items (item_id, access_token)
                    VALUES ($1, $2)
                    ON CONFLICT (item_id) DO UPDATE
                    SET access_token = EXCLUDED.access_token,
                        updated_at = NOW()
                    "#,
                )
                .bind(item_id)
                .bind(access_token)
                .execute(pool)
                .await?;
            }
            ItemStore::Memory(items) => {
                let now = Utc::now();
                let mut items = items.write().await;
                items
                    .entry(item_id.to_string())
                    .and_modify(|item| {
                        item.access_token = access_token.to_string();
                        item.updated_at = now;
                    })
                    .or_insert_with(|| LinkedItem {
                        item_id: item_id.to_string(),
                        access_token: access_token.to_string(),
                        created_at: now,
                        updated_at: now,
                    });
            }
        }

        tracing::debug!(
            item_id,
            token = %token_fingerprint(access_token),
            store = self.kind(),
            "Linked item saved"
        );
        Ok(())
    }

    /// Access token of a previously linked item, if any.
    pub async fn access_token(&self, item_id: &str) -> Result<Option<String>, AppError> {
        let item = match self {
            ItemStore::Postgres(pool) => {
                sqlx::query_as::<_, LinkedItem>(
                    r#"
                    SELECT item_id, access_token, created_at, updated_at
                    FROM linked_items
                    WHERE item_id = $1
                    "#,
                )
                .bind(item_id)
                .fetch_optional(pool)
                .await?
            }
            ItemStore::Memory(items) => items.read().await.get(item_id).cloned(),
        };

        Ok(item.map(|item| {
            tracing::debug!(
                item_id = %item.item_id,
                token = %token_fingerprint(&item.access_token),
                "Access token resolved"
            );
            item.access_token
        }))
    }

    /// Verify the store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        if let ItemStore::Postgres(pool) = self {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
