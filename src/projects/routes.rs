//! Project routes

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

/// Creates and returns the projects router
pub fn projects_routes() -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::get_projects).post(handlers::create_project),
        )
        .route(
            "/api/projects/:id",
            put(handlers::update_project).delete(handlers::delete_project),
        )
        .route("/api/public/projects", get(handlers::public_projects))
}
