// src/profile/handlers/qualifications.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{
    CreateQualificationRequest, Qualification, UpdateQualificationRequest,
};
use super::super::validators::QualificationValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_qualification_id, portfolio_owner_id, ApiError, AppState, Validator};

/// GET /api/profile/qualifications - Get all qualifications for the authenticated user
pub async fn get_qualifications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Qualification>>, ApiError> {
    let state = state_lock.read().await.clone();

    let qualifications = sqlx::query_as::<_, Qualification>(
        "SELECT * FROM qualifications WHERE user_id = ? ORDER BY end_date DESC, start_date DESC",
    )
    .bind(&authed.0.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error fetching qualifications");
        ApiError::DatabaseError(e)
    })?;

    Ok(Json(qualifications))
}

/// GET /api/public/qualifications - Public qualification list of the portfolio owner
pub async fn public_qualifications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Qualification>>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = match portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
    {
        Some(id) => id,
        None => return Ok(Json(Vec::new())),
    };

    let qualifications = sqlx::query_as::<_, Qualification>(
        "SELECT * FROM qualifications WHERE user_id = ? ORDER BY end_date DESC, start_date DESC",
    )
    .bind(&owner_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(qualifications))
}

/// POST /api/profile/qualifications - Create a new qualification
pub async fn create_qualification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateQualificationRequest>,
) -> Result<Json<Qualification>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = QualificationValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.0.id,
            errors = ?validation_result.errors,
            "Qualification creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let qualification_id = generate_qualification_id();

    sqlx::query(
        r#"
        INSERT INTO qualifications (id, user_id, institution, title, start_date, end_date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&qualification_id)
    .bind(&authed.0.id)
    .bind(&request.institution)
    .bind(&request.title)
    .bind(request.start_date.as_deref())
    .bind(request.end_date.as_deref())
    .bind(request.description.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error creating qualification");
        ApiError::DatabaseError(e)
    })?;

    let qualification =
        sqlx::query_as::<_, Qualification>("SELECT * FROM qualifications WHERE id = ?")
            .bind(&qualification_id)
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.0.id,
        qualification_id = %qualification_id,
        institution = %request.institution,
        "Qualification created"
    );

    Ok(Json(qualification))
}

/// PUT /api/profile/qualifications/:id - Update an existing qualification
pub async fn update_qualification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(qualification_id): Path<String>,
    Json(request): Json<UpdateQualificationRequest>,
) -> Result<Json<Qualification>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = QualificationValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let result = sqlx::query(
        r#"
        UPDATE qualifications SET institution = ?, title = ?, start_date = ?, end_date = ?,
            description = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&request.institution)
    .bind(&request.title)
    .bind(request.start_date.as_deref())
    .bind(request.end_date.as_deref())
    .bind(request.description.as_deref())
    .bind(&qualification_id)
    .bind(&authed.0.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("qualification not found".to_string()));
    }

    let qualification =
        sqlx::query_as::<_, Qualification>("SELECT * FROM qualifications WHERE id = ?")
            .bind(&qualification_id)
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, qualification_id = %qualification_id, "Qualification updated");

    Ok(Json(qualification))
}

/// DELETE /api/profile/qualifications/:id - Delete a qualification
pub async fn delete_qualification(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(qualification_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM qualifications WHERE id = ? AND user_id = ?")
        .bind(&qualification_id)
        .bind(&authed.0.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("qualification not found".to_string()));
    }

    info!(user_id = %authed.0.id, qualification_id = %qualification_id, "Qualification deleted");

    Ok(StatusCode::NO_CONTENT)
}
