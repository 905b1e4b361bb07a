// src/admin/handlers/dashboard.rs
//! Dashboard summary handler

use axum::extract::{Extension, Json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::admin::models::DashboardSummary;
use crate::auth::AdminUser;
use crate::common::{ApiError, AppState};

async fn count(db: &SqlitePool, sql: &str) -> Result<i64, ApiError> {
    let row: (i64,) = sqlx::query_as(sql)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)?;
    Ok(row.0)
}

/// GET /api/admin/dashboard - Content counts for the admin landing page
pub async fn dashboard_summary(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let state = state_lock.read().await.clone();
    let db = &state.db;

    let summary = DashboardSummary {
        users: count(db, "SELECT COUNT(*) FROM users").await?,
        projects: count(db, "SELECT COUNT(*) FROM projects").await?,
        skills: count(db, "SELECT COUNT(*) FROM skills").await?,
        experiences: count(db, "SELECT COUNT(*) FROM experiences").await?,
        qualifications: count(db, "SELECT COUNT(*) FROM qualifications").await?,
        testimonials: count(db, "SELECT COUNT(*) FROM testimonials").await?,
        pending_testimonials: count(db, "SELECT COUNT(*) FROM testimonials WHERE approved = 0")
            .await?,
        unread_messages: count(db, "SELECT COUNT(*) FROM contact_messages WHERE read = 0").await?,
        total_visits: count(db, "SELECT COUNT(*) FROM visits").await?,
    };

    Ok(Json(summary))
}
