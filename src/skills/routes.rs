//! Skill routes

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

/// Creates and returns the skills router
pub fn skills_routes() -> Router {
    Router::new()
        .route(
            "/api/skills",
            get(handlers::get_skills).post(handlers::create_skill),
        )
        .route(
            "/api/skills/:id",
            put(handlers::update_skill).delete(handlers::delete_skill),
        )
        .route("/api/public/skills", get(handlers::public_skills))
}
