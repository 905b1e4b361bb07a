//! Contact routes

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

/// Creates and returns the contact router
pub fn contact_routes() -> Router {
    Router::new()
        .route("/api/public/contact", post(handlers::submit_contact_form))
        .route("/api/admin/contact", get(handlers::list_messages))
        .route("/api/admin/contact/:id/read", put(handlers::mark_read))
        .route(
            "/api/admin/contact/:id",
            axum::routing::delete(handlers::delete_message),
        )
}
