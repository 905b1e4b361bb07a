//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, oauth};

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/register` - Local account signup
/// - `POST /api/auth/login` - Local credential login
/// - `POST /api/auth/refresh` - Exchange refresh cookie for a new access token
/// - `POST /api/auth/logout` - Revoke refresh tokens and clear the cookie
/// - `GET /api/me` - Get current user information
/// - `GET /oauth2/authorize/:provider` - Start social login
/// - `GET /oauth2/callback/:provider` - Provider callback
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/refresh", post(handlers::refresh_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route("/api/me", get(handlers::me_handler))
        .route("/oauth2/authorize/:provider", get(oauth::oauth_authorize))
        .route("/oauth2/callback/:provider", get(oauth::oauth_callback))
}
