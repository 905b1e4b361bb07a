// src/projects/handlers.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{CreateProjectRequest, Project, UpdateProjectRequest};
use super::validators::ProjectValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_project_id, portfolio_owner_id, ApiError, AppState, Validator};

fn encode_tech(tech: &[String]) -> Result<String, ApiError> {
    serde_json::to_string(tech)
        .map_err(|e| ApiError::InternalServer(format!("failed to encode tech list: {}", e)))
}

/// GET /api/projects - All projects for the authenticated user
pub async fn get_projects(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let state = state_lock.read().await.clone();

    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = ? ORDER BY featured DESC, sort_order, created_at",
    )
    .bind(&authed.0.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error fetching projects");
        ApiError::DatabaseError(e)
    })?;

    Ok(Json(projects))
}

/// GET /api/public/projects - Public project list of the portfolio owner
pub async fn public_projects(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = match portfolio_owner_id(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
    {
        Some(id) => id,
        None => return Ok(Json(Vec::new())),
    };

    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = ? ORDER BY featured DESC, sort_order, created_at",
    )
    .bind(&owner_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(projects))
}

/// POST /api/projects - Create a project
pub async fn create_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ProjectValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.0.id,
            errors = ?validation_result.errors,
            "Project creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let project_id = generate_project_id();
    let tech = encode_tech(&request.tech)?;

    sqlx::query(
        r#"
        INSERT INTO projects (id, user_id, title, description, tech, repo_url, live_url, featured, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&project_id)
    .bind(&authed.0.id)
    .bind(&request.title)
    .bind(request.description.as_deref())
    .bind(&tech)
    .bind(request.repo_url.as_deref())
    .bind(request.live_url.as_deref())
    .bind(request.featured as i64)
    .bind(request.sort_order)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.0.id, "Database error creating project");
        ApiError::DatabaseError(e)
    })?;

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.0.id,
        project_id = %project_id,
        title = %request.title,
        "Project created"
    );

    Ok(Json(project))
}

/// PUT /api/projects/:id - Update a project
pub async fn update_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ProjectValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let tech = encode_tech(&request.tech)?;

    let result = sqlx::query(
        r#"
        UPDATE projects SET title = ?, description = ?, tech = ?, repo_url = ?, live_url = ?,
            featured = ?, sort_order = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&request.title)
    .bind(request.description.as_deref())
    .bind(&tech)
    .bind(request.repo_url.as_deref())
    .bind(request.live_url.as_deref())
    .bind(request.featured as i64)
    .bind(request.sort_order)
    .bind(&project_id)
    .bind(&authed.0.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("project not found".to_string()));
    }

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.0.id, project_id = %project_id, "Project updated");

    Ok(Json(project))
}

/// DELETE /api/projects/:id - Delete a project
pub async fn delete_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM projects WHERE id = ? AND user_id = ?")
        .bind(&project_id)
        .bind(&authed.0.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("project not found".to_string()));
    }

    info!(user_id = %authed.0.id, project_id = %project_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}
