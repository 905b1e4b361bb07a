// Skill validators

use super::models::CreateSkillRequest;
use crate::common::{ValidationResult, Validator};

pub struct SkillValidator;

impl Validator<CreateSkillRequest> for SkillValidator {
    fn validate(&self, data: &CreateSkillRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "name is required");
        }
        if !(0..=100).contains(&data.level) {
            result.add_error("level", "level must be between 0 and 100");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateSkillRequest {
        CreateSkillRequest {
            name: "Rust".to_string(),
            category: Some("Languages".to_string()),
            level: 85,
            sort_order: 0,
        }
    }

    #[test]
    fn test_valid_skill_passes() {
        assert!(SkillValidator.validate(&request()).is_valid);
    }

    #[test]
    fn test_name_required() {
        let mut r = request();
        r.name = "  ".to_string();
        let result = SkillValidator.validate(&r);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "name");
    }

    #[test]
    fn test_level_out_of_range_rejected() {
        let mut r = request();
        r.level = 101;
        assert!(!SkillValidator.validate(&r).is_valid);

        r.level = -1;
        assert!(!SkillValidator.validate(&r).is_valid);
    }
}
