// src/services/settings.rs
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Setting not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
struct CachedSetting {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SettingsService {
    db_pool: SqlitePool,
    cache: Arc<RwLock<HashMap<String, CachedSetting>>>,
    cache_ttl: Duration,
}

impl SettingsService {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self {
            db_pool,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl: Duration::minutes(5),
        }
    }

    /// Get a setting value by key
    /// Falls back to environment variable if not found in database
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(key) {
                if cached.expires_at > Utc::now() {
                    debug!(key = %key, "Setting retrieved from cache");
                    return Ok(Some(cached.value.clone()));
                }
            }
        }

        let result = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM system_settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some((_, value)) = result {
            {
                let mut cache = self.cache.write().await;
                cache.insert(
                    key.to_string(),
                    CachedSetting {
                        value: value.clone(),
                        expires_at: Utc::now() + self.cache_ttl,
                    },
                );
            }

            debug!(key = %key, "Setting retrieved from database");
            Ok(Some(value))
        } else {
            if let Ok(env_value) = env::var(key.to_uppercase()) {
                debug!(key = %key, "Setting retrieved from environment variable");
                return Ok(Some(env_value));
            }

            debug!(key = %key, "Setting not found");
            Ok(None)
        }
    }

    /// Set a setting value
    pub async fn set_setting(
        &self,
        key: &str,
        value: &str,
        updated_by: Option<&str>,
    ) -> Result<(), SettingsError> {
        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value, updated_at, updated_by)
            VALUES (?, ?, datetime('now'), COALESCE(?, 'system'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at,
                updated_by = excluded.updated_by
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .execute(&self.db_pool)
        .await?;

        {
            let mut cache = self.cache.write().await;
            cache.remove(key);
        }

        info!(key = %key, "Setting updated successfully");
        Ok(())
    }

    /// Get all settings
    pub async fn get_all_settings(&self) -> Result<HashMap<String, String>, SettingsError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM system_settings ORDER BY key",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let settings: HashMap<String, String> = rows.into_iter().collect();

        debug!(count = settings.len(), "Retrieved all settings");
        Ok(settings)
    }

    /// Invalidate the entire cache
    pub async fn invalidate_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        info!("Settings cache invalidated");
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate_cache_key(&self, key: &str) {
        let mut cache = self.cache.write().await;
        cache.remove(key);
        debug!(key = %key, "Cache entry invalidated");
    }

    /// Delete a setting
    pub async fn delete_setting(&self, key: &str) -> Result<(), SettingsError> {
        let result = sqlx::query("DELETE FROM system_settings WHERE key = ?")
            .bind(key)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SettingsError::NotFound(key.to_string()));
        }

        self.invalidate_cache_key(key).await;

        info!(key = %key, "Setting deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE system_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT DEFAULT (datetime('now')),
                updated_by TEXT NOT NULL DEFAULT 'system'
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_set_and_get_setting() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        service
            .set_setting("site_title", "My Portfolio", Some("admin"))
            .await
            .unwrap();

        let value = service.get_setting("site_title").await.unwrap();
        assert_eq!(value, Some("My Portfolio".to_string()));
    }

    #[tokio::test]
    async fn test_cache_survives_repeat_reads() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        service
            .set_setting("cached_key", "cached_value", Some("admin"))
            .await
            .unwrap();

        let value1 = service.get_setting("cached_key").await.unwrap();
        assert_eq!(value1, Some("cached_value".to_string()));

        let value2 = service.get_setting("cached_key").await.unwrap();
        assert_eq!(value2, Some("cached_value".to_string()));

        service.invalidate_cache_key("cached_key").await;

        let value3 = service.get_setting("cached_key").await.unwrap();
        assert_eq!(value3, Some("cached_value".to_string()));
    }

    #[tokio::test]
    async fn test_set_invalidates_stale_cache() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        service
            .set_setting("timezone", "UTC", Some("admin"))
            .await
            .unwrap();
        assert_eq!(
            service.get_setting("timezone").await.unwrap(),
            Some("UTC".to_string())
        );

        service
            .set_setting("timezone", "Europe/Berlin", Some("admin"))
            .await
            .unwrap();
        assert_eq!(
            service.get_setting("timezone").await.unwrap(),
            Some("Europe/Berlin".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_all_settings() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        service
            .set_setting("key1", "value1", Some("admin"))
            .await
            .unwrap();
        service
            .set_setting("key2", "value2", Some("admin"))
            .await
            .unwrap();

        let all_settings = service.get_all_settings().await.unwrap();
        assert_eq!(all_settings.len(), 2);
        assert_eq!(all_settings.get("key1"), Some(&"value1".to_string()));
        assert_eq!(all_settings.get("key2"), Some(&"value2".to_string()));
    }

    #[tokio::test]
    async fn test_delete_setting() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        service
            .set_setting("delete_me", "value", Some("admin"))
            .await
            .unwrap();

        service.delete_setting("delete_me").await.unwrap();

        let value = service.get_setting("delete_me").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_delete_missing_setting_errors() {
        let pool = setup_test_db().await;
        let service = SettingsService::new(pool);

        let result = service.delete_setting("never_set").await;
        assert!(matches!(result, Err(SettingsError::NotFound(_))));
    }
}
