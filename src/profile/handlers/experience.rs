// src/profile/handlers/experience.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::super::models::{CreateExperienceRequest, Experience, UpdateExperienceRequest};
use super::super::validators::ExperienceValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_experience_id, portfolio_owner_id, ApiError, AppState, Validator};

/// GET /api/profile/experience - Get all experiences for the authenticated user
pub async fn get_experiences(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Experience>>, ApiError> {
    let state = state_lock.read().await.clone();

    let experiences = sqlx::query_as::<_, Experience>(
        "SELECT * FROM experiences WHERE user_id = ? ORDER BY start_date DESC",
    )
    .bind(&authed.0.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error fetching experiences");
        ApiError::DatabaseError(e)
    })?;

    debug!(
        user_id = %authed.0.id,
        experience_count = experiences.len(),
        "Fetched user experiences"
    );

    Ok(Json(experiences))
}

/// GET /api/public/experience - Public experience list of the portfolio owner
pub async fn public_experiences(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Experience>>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = match portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
    {
        Some(id) => id,
        None => return Ok(Json(Vec::new())),
    };

    let experiences = sqlx::query_as::<_, Experience>(
        "SELECT * FROM experiences WHERE user_id = ? ORDER BY start_date DESC",
    )
    .bind(&owner_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(experiences))
}

/// POST /api/profile/experience - Create a new experience
pub async fn create_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateExperienceRequest>,
) -> Result<Json<Experience>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ExperienceValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.0.id,
            errors = ?validation_result.errors,
            "Experience creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let experience_id = generate_experience_id();

    sqlx::query(
        r#"
        INSERT INTO experiences (id, user_id, company, title, start_date, end_date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&experience_id)
    .bind(&authed.0.id)
    .bind(&request.company)
    .bind(&request.title)
    .bind(&request.start_date)
    .bind(request.end_date.as_deref())
    .bind(request.description.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error creating experience");
        ApiError::DatabaseError(e)
    })?;

    let experience = sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = ?")
        .bind(&experience_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.0.id,
        experience_id = %experience_id,
        company = %request.company,
        "Experience created"
    );

    Ok(Json(experience))
}

/// PUT /api/profile/experience/:id - Update an existing experience
pub async fn update_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(experience_id): Path<String>,
    Json(request): Json<UpdateExperienceRequest>,
) -> Result<Json<Experience>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ExperienceValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let result = sqlx::query(
        r#"
        UPDATE experiences SET company = ?, title = ?, start_date = ?, end_date = ?,
            description = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&request.company)
    .bind(&request.title)
    .bind(&request.start_date)
    .bind(request.end_date.as_deref())
    .bind(request.description.as_deref())
    .bind(&experience_id)
    .bind(&authed.0.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("experience not found".to_string()));
    }

    let experience = sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = ?")
        .bind(&experience_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, experience_id = %experience_id, "Experience updated");

    Ok(Json(experience))
}

/// DELETE /api/profile/experience/:id - Delete an experience
pub async fn delete_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(experience_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM experiences WHERE id = ? AND user_id = ?")
        .bind(&experience_id)
        .bind(&authed.0.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("experience not found".to_string()));
    }

    info!(user_id = %authed.0.id, experience_id = %experience_id, "Experience deleted");

    Ok(StatusCode::NO_CONTENT)
}
