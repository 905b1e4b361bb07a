// src/admin/handlers/settings.rs
//! System settings handlers

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::admin::models::UpdateSettingsRequest;
use crate::auth::AdminUser;
use crate::common::{ApiError, AppState};
use crate::services::SettingsError;

fn map_settings_error(e: SettingsError) -> ApiError {
    match e {
        SettingsError::NotFound(key) => ApiError::NotFound(format!("setting not found: {}", key)),
        SettingsError::DatabaseError(e) => ApiError::DatabaseError(e),
    }
}

/// Site metadata keys safe to expose without authentication
const PUBLIC_SETTING_KEYS: [&str; 4] = [
    "site_title",
    "site_description",
    "contact_email",
    "timezone",
];

/// GET /api/public/settings - Site metadata for the public site
///
/// Reads go through the settings cache: this endpoint is hit on every page
/// load, so each key is served from memory between TTL refreshes.
pub async fn public_settings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut settings = HashMap::new();
    for key in PUBLIC_SETTING_KEYS {
        if let Some(value) = state
            .settings_service
            .get_setting(key)
            .await
            .map_err(map_settings_error)?
        {
            settings.insert(key.to_string(), value);
        }
    }

    Ok(Json(settings))
}

/// GET /api/admin/settings - All system settings
pub async fn get_settings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    let state = state_lock.read().await.clone();

    let settings = state
        .settings_service
        .get_all_settings()
        .await
        .map_err(map_settings_error)?;

    Ok(Json(settings))
}

/// PUT /api/admin/settings - Upsert a batch of settings
pub async fn update_settings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    admin: AdminUser,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    let state = state_lock.read().await.clone();

    if request.settings.is_empty() {
        return Err(ApiError::BadRequest("no settings provided".to_string()));
    }

    for (key, value) in &request.settings {
        if key.trim().is_empty() {
            return Err(ApiError::BadRequest("setting key cannot be empty".to_string()));
        }

        state
            .settings_service
            .set_setting(key, value, Some(&admin.0.email))
            .await
            .map_err(map_settings_error)?;
    }

    info!(
        admin_id = %admin.0.id,
        count = request.settings.len(),
        "System settings updated"
    );

    let settings = state
        .settings_service
        .get_all_settings()
        .await
        .map_err(map_settings_error)?;

    Ok(Json(settings))
}

/// DELETE /api/admin/settings/:key - Remove a setting
pub async fn delete_setting(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    admin: AdminUser,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    state
        .settings_service
        .delete_setting(&key)
        .await
        .map_err(map_settings_error)?;

    info!(admin_id = %admin.0.id, key = %key, "Setting deleted");

    Ok(StatusCode::NO_CONTENT)
}
