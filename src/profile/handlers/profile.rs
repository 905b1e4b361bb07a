// src/profile/handlers/profile.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::super::models::{Profile, UpdateProfileRequest};
use crate::auth::AuthedUser;
use crate::common::{portfolio_owner_id, ApiError, AppState};

/// GET /api/profile - Get the authenticated user's profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    let profile = fetch_or_default(&state, &authed.0.id).await?;
    Ok(Json(profile))
}

/// PUT /api/profile - Create or update the authenticated user's profile
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.0.id, "Updating profile");

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, headline, bio, location, website, github_url, linkedin_url, avatar, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            headline = excluded.headline,
            bio = excluded.bio,
            location = excluded.location,
            website = excluded.website,
            github_url = excluded.github_url,
            linkedin_url = excluded.linkedin_url,
            avatar = excluded.avatar,
            updated_at = datetime('now')
        "#,
    )
    .bind(&authed.0.id)
    .bind(request.headline.as_deref())
    .bind(request.bio.as_deref())
    .bind(request.location.as_deref())
    .bind(request.website.as_deref())
    .bind(request.github_url.as_deref())
    .bind(request.linkedin_url.as_deref())
    .bind(request.avatar.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error updating profile");
        ApiError::DatabaseError(e)
    })?;

    let profile = fetch_or_default(&state, &authed.0.id).await?;
    Ok(Json(profile))
}

/// GET /api/public/profile - Public profile of the portfolio owner
pub async fn public_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("portfolio not configured".to_string()))?;

    let profile = fetch_or_default(&state, &owner_id).await?;
    Ok(Json(profile))
}

async fn fetch_or_default(state: &AppState, user_id: &str) -> Result<Profile, ApiError> {
    let profile: Option<Profile> =
        sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(profile.unwrap_or(Profile {
        user_id: user_id.to_string(),
        headline: None,
        bio: None,
        location: None,
        website: None,
        github_url: None,
        linkedin_url: None,
        avatar: None,
        updated_at: None,
    }))
}
