//! Admin data models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub users: i64,
    pub projects: i64,
    pub skills: i64,
    pub experiences: i64,
    pub qualifications: i64,
    pub testimonials: i64,
    pub pending_testimonials: i64,
    pub unread_messages: i64,
    pub total_visits: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub roles: String,
    pub provider: String,
    pub email_verified: bool,
    pub active: bool,
    pub created_at: Option<String>,
}
