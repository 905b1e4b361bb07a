// Project validators

use super::models::CreateProjectRequest;
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 8000;
const MAX_TECH_ITEMS: usize = 50;

pub struct ProjectValidator;

impl Validator<CreateProjectRequest> for ProjectValidator {
    fn validate(&self, data: &CreateProjectRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "title is required");
        }
        if data.title.len() > MAX_TITLE_LEN {
            result.add_error("title", "title is too long");
        }
        if let Some(description) = &data.description {
            if description.len() > MAX_DESCRIPTION_LEN {
                result.add_error("description", "description is too long");
            }
        }
        if data.tech.len() > MAX_TECH_ITEMS {
            result.add_error("tech", "too many tech entries");
        }
        for url in [&data.repo_url, &data.live_url].into_iter().flatten() {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error("url", "URLs must be http(s)");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProjectRequest {
        CreateProjectRequest {
            title: "Portfolio Site".to_string(),
            description: Some("This very site".to_string()),
            tech: vec!["rust".to_string(), "axum".to_string()],
            repo_url: Some("https://github.com/jane/portfolio".to_string()),
            live_url: None,
            featured: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_valid_project_passes() {
        assert!(ProjectValidator.validate(&request()).is_valid);
    }

    #[test]
    fn test_title_required() {
        let mut r = request();
        r.title = "  ".to_string();
        let result = ProjectValidator.validate(&r);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "title");
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut r = request();
        r.repo_url = Some("javascript:alert(1)".to_string());
        assert!(!ProjectValidator.validate(&r).is_valid);
    }
}
