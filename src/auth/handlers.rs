//! Authentication handlers

use axum::extract::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::cookies::{removal_cookie, session_cookie};
use super::extractors::AuthedUser;
use super::models::{AuthProvider, LoginRequest, RegisterRequest, Role, User};
use super::refresh::RefreshTokenError;
use crate::common::{
    generate_user_id, safe_email_log, validation::is_valid_email, ApiError, AppState,
};

/// POST /api/auth/register
/// Creates a local (password) account
///
/// # Request Body
/// ```json
/// {
///   "email": "jane@example.com",
///   "password": "...",
///   "name": "Jane"
/// }
/// ```
pub async fn register_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    if !is_valid_email(&payload.email) {
        return Err(ApiError::ValidationError("invalid email address".to_string()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::ValidationError(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let email = payload.email.trim().to_lowercase();

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Registration rejected: email already in use");
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))?;

    let id = generate_user_id();
    let roles = if state.admin_emails.contains(&email) {
        format!("{},{}", Role::User.as_str(), Role::Admin.as_str())
    } else {
        Role::User.as_str().to_string()
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, name, roles, provider,
            email_verified, active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, 1, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(&password_hash)
    .bind(payload.name.as_deref())
    .bind(&roles)
    .bind(AuthProvider::Local.as_str())
    .execute(&state.db)
    .await
    .map_err(map_user_insert_error)?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "New local account registered"
    );

    issue_session(&state, jar, &user).await
}

/// POST /api/auth/login
/// Verifies local credentials and opens a session
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    let email = payload.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    // Identical rejection for unknown email and wrong password
    let user = user.ok_or_else(|| {
        warn!(email = %safe_email_log(&email), "Login failed: unknown email");
        ApiError::Unauthorized("invalid credentials".to_string())
    })?;

    let hash = user.password_hash.as_deref().ok_or_else(|| {
        let provider = user.provider.clone();
        warn!(user_id = %user.id, provider = %provider, "Login failed: account has no password");
        ApiError::Unauthorized(format!(
            "this account uses {} login",
            provider
        ))
    })?;

    let password_ok = bcrypt::verify(&payload.password, hash)
        .map_err(|e| ApiError::InternalServer(format!("password verification failed: {}", e)))?;

    if !password_ok {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    if !user.is_active() {
        warn!(user_id = %user.id, "Login failed: account deactivated");
        return Err(ApiError::Forbidden("account deactivated".to_string()));
    }

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User logged in"
    );

    issue_session(&state, jar, &user).await
}

/// POST /api/auth/refresh
/// Exchanges the refresh cookie for a new access token.
/// The presented token is consumed and a rotated one is set in its place.
pub async fn refresh_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    let token = jar
        .get(&state.auth.refresh_cookie_name)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("missing refresh token".to_string()))?;

    let user = match state.refresh_store.redeem(&token).await {
        Ok(user) => user,
        Err(RefreshTokenError::NotFound) => {
            return Err(ApiError::Unauthorized("refresh token not found".to_string()));
        }
        Err(RefreshTokenError::Expired) => {
            return Err(ApiError::Forbidden("refresh token expired".to_string()));
        }
        Err(RefreshTokenError::Database(e)) => return Err(ApiError::DatabaseError(e)),
    };

    if !user.is_active() {
        return Err(ApiError::Forbidden("account deactivated".to_string()));
    }

    info!(user_id = %user.id, "Refresh token exchanged");

    issue_session(&state, jar, &user).await
}

/// POST /api/auth/logout
/// Revokes every refresh token for the user and clears the cookie.
/// The access token stays valid until expiry; that is the stateless trade-off.
pub async fn logout_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    state
        .refresh_store
        .revoke_all(&authed.0.id)
        .await
        .map_err(|e| match e {
            RefreshTokenError::Database(e) => ApiError::DatabaseError(e),
            other => ApiError::InternalServer(other.to_string()),
        })?;

    let jar = jar.remove(removal_cookie(&state.auth.refresh_cookie_name));

    info!(user_id = %authed.0.id, "User logged out");

    let resp = serde_json::json!({
        "message": "Logout successful"
    });
    Ok((jar, Json(resp)))
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&authed.0.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let resp = serde_json::json!({
        "user": user,
        "is_admin": authed.0.is_admin(),
    });
    Ok(Json(resp))
}

// ---- Helper Functions ----

/// The duplicate-email pre-check races with concurrent registrations; a
/// UNIQUE violation on insert is still a 409, not a server error.
pub fn map_user_insert_error(e: sqlx::Error) -> ApiError {
    match e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            ApiError::Conflict("email already registered".to_string())
        }
        other => ApiError::DatabaseError(other),
    }
}

/// Rotate the refresh token, mint an access token, and build the common
/// `{token, user}` response with the refresh cookie set.
async fn issue_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    state
        .refresh_store
        .revoke_all(&user.id)
        .await
        .map_err(|e| match e {
            RefreshTokenError::Database(e) => ApiError::DatabaseError(e),
            other => ApiError::InternalServer(other.to_string()),
        })?;

    let refresh = state.refresh_store.issue(user).await.map_err(|e| match e {
        RefreshTokenError::Database(e) => ApiError::DatabaseError(e),
        other => ApiError::InternalServer(other.to_string()),
    })?;

    let token = state
        .token_signer
        .issue(user)
        .map_err(|e| ApiError::InternalServer(format!("token signing failed: {}", e)))?;

    let jar = jar.add(session_cookie(
        &state.auth.refresh_cookie_name,
        &refresh.token,
        state.auth.refresh_token_ttl_ms / 1000,
    ));

    let resp = serde_json::json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "avatar": user.avatar,
            "is_admin": user.is_admin(),
        },
    });

    Ok((jar, Json(resp)))
}
