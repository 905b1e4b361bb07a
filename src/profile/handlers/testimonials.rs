// src/profile/handlers/testimonials.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreateTestimonialRequest, Testimonial, UpdateTestimonialRequest};
use super::super::validators::TestimonialValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_testimonial_id, portfolio_owner_id, ApiError, AppState, Validator};

/// GET /api/profile/testimonials - All testimonials for the authenticated user
pub async fn get_testimonials(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let state = state_lock.read().await.clone();

    let testimonials = sqlx::query_as::<_, Testimonial>(
        "SELECT * FROM testimonials WHERE user_id = ? ORDER BY sort_order, created_at",
    )
    .bind(&authed.0.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error fetching testimonials");
        ApiError::DatabaseError(e)
    })?;

    Ok(Json(testimonials))
}

/// GET /api/public/testimonials - Approved testimonials of the portfolio owner
pub async fn public_testimonials(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = match portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
    {
        Some(id) => id,
        None => return Ok(Json(Vec::new())),
    };

    let testimonials = sqlx::query_as::<_, Testimonial>(
        "SELECT * FROM testimonials WHERE user_id = ? AND approved = 1 ORDER BY sort_order, created_at",
    )
    .bind(&owner_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(testimonials))
}

/// POST /api/profile/testimonials - Create a testimonial
pub async fn create_testimonial(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateTestimonialRequest>,
) -> Result<Json<Testimonial>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = TestimonialValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.0.id,
            errors = ?validation_result.errors,
            "Testimonial creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let testimonial_id = generate_testimonial_id();

    sqlx::query(
        r#"
        INSERT INTO testimonials (id, user_id, author_name, author_title, content, avatar, approved, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&testimonial_id)
    .bind(&authed.0.id)
    .bind(&request.author_name)
    .bind(request.author_title.as_deref())
    .bind(&request.content)
    .bind(request.avatar.as_deref())
    .bind(request.approved as i64)
    .bind(request.sort_order)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error creating testimonial");
        ApiError::DatabaseError(e)
    })?;

    let testimonial = sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials WHERE id = ?")
        .bind(&testimonial_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.0.id,
        testimonial_id = %testimonial_id,
        author = %request.author_name,
        "Testimonial created"
    );

    Ok(Json(testimonial))
}

/// PUT /api/profile/testimonials/:id - Update a testimonial
pub async fn update_testimonial(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(testimonial_id): Path<String>,
    Json(request): Json<UpdateTestimonialRequest>,
) -> Result<Json<Testimonial>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = TestimonialValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let result = sqlx::query(
        r#"
        UPDATE testimonials SET author_name = ?, author_title = ?, content = ?, avatar = ?,
            approved = ?, sort_order = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&request.author_name)
    .bind(request.author_title.as_deref())
    .bind(&request.content)
    .bind(request.avatar.as_deref())
    .bind(request.approved as i64)
    .bind(request.sort_order)
    .bind(&testimonial_id)
    .bind(&authed.0.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("testimonial not found".to_string()));
    }

    let testimonial = sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials WHERE id = ?")
        .bind(&testimonial_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, testimonial_id = %testimonial_id, "Testimonial updated");

    Ok(Json(testimonial))
}

/// DELETE /api/profile/testimonials/:id - Delete a testimonial
pub async fn delete_testimonial(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(testimonial_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM testimonials WHERE id = ? AND user_id = ?")
        .bind(&testimonial_id)
        .bind(&authed.0.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("testimonial not found".to_string()));
    }

    info!(user_id = %authed.0.id, testimonial_id = %testimonial_id, "Testimonial deleted");

    Ok(StatusCode::NO_CONTENT)
}
