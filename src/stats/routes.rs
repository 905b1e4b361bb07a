//! Stats routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the stats router
pub fn stats_routes() -> Router {
    Router::new()
        .route("/api/public/stats/visit", post(handlers::record_visit))
        .route("/api/admin/stats", get(handlers::stats_summary))
        .route("/api/admin/stats/recent", get(handlers::recent_visits))
}
