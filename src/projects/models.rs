//! Project data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::{deserialize_string_list, serialize_string_list};

/// Portfolio project. The tech list is stored JSON-encoded in a TEXT column
/// and surfaced as an array over the API.
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(
        serialize_with = "serialize_string_list",
        deserialize_with = "deserialize_string_list"
    )]
    pub tech: Option<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: i64,
    pub sort_order: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i64,
}

pub type UpdateProjectRequest = CreateProjectRequest;
