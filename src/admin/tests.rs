//! Tests for the admin module

use axum::extract::{Extension, Json};
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::handlers::settings::public_settings;
use crate::auth::{RefreshTokenStore, TokenSigner};
use crate::common::config::AuthConfig;
use crate::common::migrations::run_migrations;
use crate::common::AppState;
use crate::services::SettingsService;

async fn test_state() -> Arc<RwLock<AppState>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("migrations failed");

    let auth = AuthConfig {
        jwt_secret: vec![0x42; 32],
        access_token_ttl_ms: 60 * 60 * 1000,
        refresh_token_ttl_ms: 60 * 60 * 1000,
        refresh_cookie_name: "portfolio_refresh".to_string(),
        public_base_url: "http://localhost:8080".to_string(),
        authorized_redirect_uris: vec!["http://localhost:3000/oauth2/redirect".to_string()],
        google: None,
        github: None,
        linkedin: None,
    };

    let token_signer = Arc::new(
        TokenSigner::new(&auth.jwt_secret, auth.access_token_ttl_ms).expect("signer"),
    );
    let refresh_store = Arc::new(RefreshTokenStore::new(pool.clone(), auth.refresh_token_ttl_ms));
    let settings_service = Arc::new(SettingsService::new(pool.clone()));

    Arc::new(RwLock::new(AppState {
        db: pool,
        http: reqwest::Client::new(),
        auth,
        admin_emails: HashSet::new(),
        token_signer,
        refresh_store,
        settings_service,
    }))
}

#[tokio::test]
async fn test_public_settings_returns_site_metadata() {
    let state_lock = test_state().await;
    {
        let state = state_lock.read().await;
        state
            .settings_service
            .set_setting("site_title", "Jane's Portfolio", Some("admin"))
            .await
            .unwrap();
        state
            .settings_service
            .set_setting("contact_email", "jane@example.com", Some("admin"))
            .await
            .unwrap();
    }

    let Json(settings) = public_settings(Extension(state_lock)).await.unwrap();
    assert_eq!(
        settings.get("site_title").map(String::as_str),
        Some("Jane's Portfolio")
    );
    assert_eq!(
        settings.get("contact_email").map(String::as_str),
        Some("jane@example.com")
    );
}

#[tokio::test]
async fn test_public_settings_served_from_cache() {
    let state_lock = test_state().await;
    {
        let state = state_lock.read().await;
        state
            .settings_service
            .set_setting("site_title", "Jane's Portfolio", Some("admin"))
            .await
            .unwrap();
    }

    let Json(first) = public_settings(Extension(state_lock.clone())).await.unwrap();
    assert_eq!(
        first.get("site_title").map(String::as_str),
        Some("Jane's Portfolio")
    );

    // Write around the service; the cached value keeps serving until the
    // TTL elapses or the key is invalidated
    {
        let state = state_lock.read().await;
        sqlx::query("UPDATE system_settings SET value = 'changed behind the cache' WHERE key = 'site_title'")
            .execute(&state.db)
            .await
            .unwrap();
    }

    let Json(second) = public_settings(Extension(state_lock)).await.unwrap();
    assert_eq!(
        second.get("site_title").map(String::as_str),
        Some("Jane's Portfolio")
    );
}
