//! Repository for the `user_api_keys` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::user_key::UserKey;
use crate::store::UserKeyStore;

/// Column list for `user_api_keys` queries.
const COLUMNS: &str = "user_id, api_key, created_at, updated_at";

/// Provides data access for per-user API keys.
#[derive(Clone)]
pub struct UserKeyRepo {
    pool: PgPool,
}

impl UserKeyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserKeyStore for UserKeyRepo {
    async fn get_key(&self, user_id: &str) -> Result<Option<UserKey>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM user_api_keys WHERE user_id = $1");
        let key = sqlx::query_as::<_, UserKey>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(key)
    }

    /// Uses `ON CONFLICT (user_id) DO UPDATE` so a second save replaces the key.
    async fn set_key(&self, user_id: &str, api_key: &str) -> Result<UserKey, StoreError> {
        let query = format!(
            "INSERT INTO user_api_keys (user_id, api_key) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 api_key = EXCLUDED.api_key, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let key = sqlx::query_as::<_, UserKey>(&query)
            .bind(user_id)
            .bind(api_key)
            .fetch_one(&self.pool)
            .await?;
        Ok(key)
    }

    async fn clear_key(&self, user_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user_api_keys WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
