// src/stats/handlers.rs
//! Visitor statistics handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use super::models::{
    DailyCount, PathCount, RecordVisitRequest, StatsSummary, Visit, VisitRecorded,
};
use crate::auth::AdminUser;
use crate::common::{generate_visit_id, ApiError, AppState};

const MAX_PATH_LEN: usize = 512;
const TOP_PATHS_LIMIT: i64 = 10;

/// A recordable path is site-relative and bounded; anything else is noise
/// or abuse and gets rejected before touching the database.
pub fn is_recordable_path(path: &str) -> bool {
    !path.is_empty() && path.starts_with('/') && path.len() <= MAX_PATH_LEN
}

/// POST /api/public/stats/visit - Record a page visit (public endpoint)
pub async fn record_visit(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<RecordVisitRequest>,
) -> Result<Json<VisitRecorded>, ApiError> {
    let state = state_lock.read().await.clone();

    let path = request.path.trim();
    if !is_recordable_path(path) {
        return Err(ApiError::BadRequest("invalid path".to_string()));
    }

    let visit_id = generate_visit_id();

    sqlx::query(
        r#"
        INSERT INTO visits (id, path, referrer, created_at)
        VALUES (?, ?, ?, datetime('now'))
        "#,
    )
    .bind(&visit_id)
    .bind(path)
    .bind(request.referrer.as_deref().map(str::trim))
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error recording visit");
        ApiError::DatabaseError(e)
    })?;

    debug!(visit_id = %visit_id, path = %path, "Visit recorded");

    Ok(Json(VisitRecorded { success: true }))
}

/// GET /api/admin/stats - Aggregated visit statistics
pub async fn stats_summary(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<StatsSummary>, ApiError> {
    let state = state_lock.read().await.clone();

    let total_visits: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits")
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let visits_last_30_days = sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT date(created_at) AS day, COUNT(*) AS count
        FROM visits
        WHERE created_at >= datetime('now', '-30 days')
        GROUP BY day
        ORDER BY day
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let top_paths = sqlx::query_as::<_, PathCount>(
        r#"
        SELECT path, COUNT(*) AS count
        FROM visits
        GROUP BY path
        ORDER BY count DESC, path
        LIMIT ?
        "#,
    )
    .bind(TOP_PATHS_LIMIT)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(StatsSummary {
        total_visits: total_visits.0,
        visits_last_30_days,
        top_paths,
    }))
}

/// GET /api/admin/stats/recent - Most recent raw visits
pub async fn recent_visits(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let state = state_lock.read().await.clone();

    let visits = sqlx::query_as::<_, Visit>(
        "SELECT * FROM visits ORDER BY created_at DESC, id DESC LIMIT 100",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(visits))
}
