//! Skill data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Skill {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: Option<String>,
    /// Self-assessed proficiency, 0-100
    pub level: i64,
    pub sort_order: i64,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub sort_order: i64,
}

pub type UpdateSkillRequest = CreateSkillRequest;
