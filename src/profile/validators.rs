// Profile module validators

use super::models::{CreateExperienceRequest, CreateQualificationRequest, CreateTestimonialRequest};
use crate::common::{ValidationResult, Validator};

/// Upper bound for free-text fields
const MAX_TEXT_LEN: usize = 4000;

pub struct ExperienceValidator;

impl Validator<CreateExperienceRequest> for ExperienceValidator {
    fn validate(&self, data: &CreateExperienceRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.company.trim().is_empty() {
            result.add_error("company", "company is required");
        }
        if data.title.trim().is_empty() {
            result.add_error("title", "title is required");
        }
        if data.start_date.trim().is_empty() {
            result.add_error("start_date", "start date is required");
        }
        if let Some(description) = &data.description {
            if description.len() > MAX_TEXT_LEN {
                result.add_error("description", "description is too long");
            }
        }

        result
    }
}

pub struct QualificationValidator;

impl Validator<CreateQualificationRequest> for QualificationValidator {
    fn validate(&self, data: &CreateQualificationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.institution.trim().is_empty() {
            result.add_error("institution", "institution is required");
        }
        if data.title.trim().is_empty() {
            result.add_error("title", "title is required");
        }
        if let Some(description) = &data.description {
            if description.len() > MAX_TEXT_LEN {
                result.add_error("description", "description is too long");
            }
        }

        result
    }
}

pub struct TestimonialValidator;

impl Validator<CreateTestimonialRequest> for TestimonialValidator {
    fn validate(&self, data: &CreateTestimonialRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.author_name.trim().is_empty() {
            result.add_error("author_name", "author name is required");
        }
        if data.content.trim().is_empty() {
            result.add_error("content", "content is required");
        }
        if data.content.len() > MAX_TEXT_LEN {
            result.add_error("content", "content is too long");
        }

        result
    }
}
