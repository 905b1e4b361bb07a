// src/admin/handlers/users.rs
//! Admin user management handlers

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::admin::models::{AdminUserView, SetActiveRequest};
use crate::auth::{AdminUser, RefreshTokenError, User};
use crate::common::{safe_email_log, ApiError, AppState};

fn to_view(user: User) -> AdminUserView {
    AdminUserView {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        roles: user.roles.clone(),
        provider: user.provider.clone(),
        email_verified: user.email_verified != 0,
        active: user.is_active(),
        created_at: user.created_at,
    }
}

/// GET /api/admin/users - List all user accounts
pub async fn list_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<Vec<AdminUserView>>, ApiError> {
    let state = state_lock.read().await.clone();

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(users.into_iter().map(to_view).collect()))
}

/// PUT /api/admin/users/:id/active - Activate or deactivate an account
pub async fn set_user_active(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    admin: AdminUser,
    Path(user_id): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<AdminUserView>, ApiError> {
    let state = state_lock.read().await.clone();

    // Admins cannot lock themselves out
    if user_id == admin.0.id && !request.active {
        warn!(admin_id = %admin.0.id, "Admin attempted to deactivate own account");
        return Err(ApiError::BadRequest(
            "cannot deactivate your own account".to_string(),
        ));
    }

    let result = sqlx::query(
        "UPDATE users SET active = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(if request.active { 1 } else { 0 })
    .bind(&user_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("user not found".to_string()));
    }

    // Deactivation invalidates every open session for the account
    if !request.active {
        state
            .refresh_store
            .revoke_all(&user_id)
            .await
            .map_err(|e| match e {
                RefreshTokenError::Database(e) => ApiError::DatabaseError(e),
                other => ApiError::InternalServer(other.to_string()),
            })?;
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        admin_id = %admin.0.id,
        user_id = %user_id,
        email = %safe_email_log(&user.email),
        active = request.active,
        "User active flag updated"
    );

    Ok(Json(to_view(user)))
}
