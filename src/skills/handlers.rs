// src/skills/handlers.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{CreateSkillRequest, Skill, UpdateSkillRequest};
use super::validators::SkillValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_skill_id, portfolio_owner_id, ApiError, AppState, Validator};

/// GET /api/skills - All skills for the authenticated user
pub async fn get_skills(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Skill>>, ApiError> {
    let state = state_lock.read().await.clone();

    let skills = sqlx::query_as::<_, Skill>(
        "SELECT * FROM skills WHERE user_id = ? ORDER BY category, sort_order, name",
    )
    .bind(&authed.0.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error fetching skills");
        ApiError::DatabaseError(e)
    })?;

    Ok(Json(skills))
}

/// GET /api/public/skills - Public skill list of the portfolio owner
pub async fn public_skills(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Skill>>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = match portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
    {
        Some(id) => id,
        None => return Ok(Json(Vec::new())),
    };

    let skills = sqlx::query_as::<_, Skill>(
        "SELECT * FROM skills WHERE user_id = ? ORDER BY category, sort_order, name",
    )
    .bind(&owner_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(skills))
}

/// POST /api/skills - Create a skill
pub async fn create_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = SkillValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.0.id,
            errors = ?validation_result.errors,
            "Skill creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let skill_id = generate_skill_id();

    sqlx::query(
        r#"
        INSERT INTO skills (id, user_id, name, category, level, sort_order, created_at)
        VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
        "#,
    )
    .bind(&skill_id)
    .bind(&authed.0.id)
    .bind(&request.name)
    .bind(request.category.as_deref())
    .bind(request.level)
    .bind(request.sort_order)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error creating skill");
        ApiError::DatabaseError(e)
    })?;

    let skill = sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = ?")
        .bind(&skill_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, skill_id = %skill_id, name = %request.name, "Skill created");

    Ok(Json(skill))
}

/// PUT /api/skills/:id - Update a skill
pub async fn update_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(skill_id): Path<String>,
    Json(request): Json<UpdateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = SkillValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let result = sqlx::query(
        r#"
        UPDATE skills SET name = ?, category = ?, level = ?, sort_order = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&request.name)
    .bind(request.category.as_deref())
    .bind(request.level)
    .bind(request.sort_order)
    .bind(&skill_id)
    .bind(&authed.0.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("skill not found".to_string()));
    }

    let skill = sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = ?")
        .bind(&skill_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, skill_id = %skill_id, "Skill updated");

    Ok(Json(skill))
}

/// DELETE /api/skills/:id - Delete a skill
pub async fn delete_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(skill_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM skills WHERE id = ? AND user_id = ?")
        .bind(&skill_id)
        .bind(&authed.0.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("skill not found".to_string()));
    }

    info!(user_id = %authed.0.id, skill_id = %skill_id, "Skill deleted");

    Ok(StatusCode::NO_CONTENT)
}
