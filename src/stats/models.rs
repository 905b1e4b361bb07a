//! Visitor statistics data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Visit {
    pub id: String,
    pub path: String,
    pub referrer: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordVisitRequest {
    pub path: String,
    pub referrer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VisitRecorded {
    pub success: bool,
}

#[derive(FromRow, Serialize, Debug)]
pub struct DailyCount {
    pub day: String,
    pub count: i64,
}

#[derive(FromRow, Serialize, Debug)]
pub struct PathCount {
    pub path: String,
    pub count: i64,
}

#[derive(Serialize, Debug)]
pub struct StatsSummary {
    pub total_visits: i64,
    pub visits_last_30_days: Vec<DailyCount>,
    pub top_paths: Vec<PathCount>,
}
