//! Profile data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Portfolio profile, one row per user
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Profile {
    pub user_id: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub avatar: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub avatar: Option<String>,
}

#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Experience {
    pub id: String,
    pub user_id: String,
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateExperienceRequest {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

pub type UpdateExperienceRequest = CreateExperienceRequest;

#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Qualification {
    pub id: String,
    pub user_id: String,
    pub institution: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateQualificationRequest {
    pub institution: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

pub type UpdateQualificationRequest = CreateQualificationRequest;

#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Testimonial {
    pub id: String,
    pub user_id: String,
    pub author_name: String,
    pub author_title: Option<String>,
    pub content: String,
    pub avatar: Option<String>,
    pub approved: i64,
    pub sort_order: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateTestimonialRequest {
    pub author_name: String,
    pub author_title: Option<String>,
    pub content: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub sort_order: i64,
}

pub type UpdateTestimonialRequest = CreateTestimonialRequest;
