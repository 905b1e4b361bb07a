//! Tests for profile module validators

use super::models::{CreateExperienceRequest, CreateQualificationRequest, CreateTestimonialRequest};
use super::validators::{ExperienceValidator, QualificationValidator, TestimonialValidator};
use crate::common::Validator;

fn experience_request() -> CreateExperienceRequest {
    CreateExperienceRequest {
        company: "Acme Corp".to_string(),
        title: "Software Engineer".to_string(),
        start_date: "2021-03-01".to_string(),
        end_date: None,
        description: Some("Built things".to_string()),
    }
}

#[test]
fn test_valid_experience_passes() {
    let result = ExperienceValidator.validate(&experience_request());
    assert!(result.is_valid);
}

#[test]
fn test_experience_requires_company_and_title() {
    let mut request = experience_request();
    request.company = "  ".to_string();
    request.title = "".to_string();

    let result = ExperienceValidator.validate(&request);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_experience_description_length_bounded() {
    let mut request = experience_request();
    request.description = Some("x".repeat(5000));

    let result = ExperienceValidator.validate(&request);
    assert!(!result.is_valid);
    assert_eq!(result.errors[0].field, "description");
}

#[test]
fn test_qualification_requires_institution() {
    let request = CreateQualificationRequest {
        institution: "".to_string(),
        title: "BSc Computer Science".to_string(),
        start_date: None,
        end_date: None,
        description: None,
    };

    let result = QualificationValidator.validate(&request);
    assert!(!result.is_valid);
    assert_eq!(result.errors[0].field, "institution");
}

#[test]
fn test_testimonial_requires_author_and_content() {
    let request = CreateTestimonialRequest {
        author_name: "".to_string(),
        author_title: None,
        content: " ".to_string(),
        avatar: None,
        approved: false,
        sort_order: 0,
    };

    let result = TestimonialValidator.validate(&request);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 2);
}
