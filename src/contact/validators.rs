// Contact form validators

use super::models::ContactFormRequest;
use crate::common::validation::is_valid_email;
use crate::common::{ValidationResult, Validator};

const MAX_MESSAGE_LEN: usize = 10_000;

pub struct ContactFormValidator;

impl Validator<ContactFormRequest> for ContactFormValidator {
    fn validate(&self, data: &ContactFormRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "name is required");
        }
        if !is_valid_email(&data.email) {
            result.add_error("email", "valid email is required");
        }
        if data.subject.trim().is_empty() {
            result.add_error("subject", "subject is required");
        }
        if data.message.trim().is_empty() {
            result.add_error("message", "message is required");
        }
        if data.message.len() > MAX_MESSAGE_LEN {
            result.add_error("message", "message is too long");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission_passes() {
        let request = ContactFormRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Love the site".to_string(),
        };
        assert!(ContactFormValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_bad_email_rejected() {
        let request = ContactFormRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            subject: "Hello".to_string(),
            message: "Hi".to_string(),
        };
        let result = ContactFormValidator.validate(&request);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "email");
    }

    #[test]
    fn test_empty_fields_collected() {
        let request = ContactFormRequest {
            name: "".to_string(),
            email: "".to_string(),
            subject: "".to_string(),
            message: "".to_string(),
        };
        let result = ContactFormValidator.validate(&request);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
    }
}
