//! Admin routes

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::handlers::{dashboard, settings, users};

/// Creates and returns the admin router
pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/public/settings", get(settings::public_settings))
        .route("/api/admin/dashboard", get(dashboard::dashboard_summary))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/:id/active", put(users::set_user_active))
        .route(
            "/api/admin/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/api/admin/settings/:key", delete(settings::delete_setting))
}
