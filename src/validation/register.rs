//! Registration input validation

use crate::types::DevLinkError;
use crate::validation::pwreset::collect_password_errors;
use crate::validation::{is_valid_email, FieldErrors};

/// Validate registration details (name, email, password + confirmation)
pub fn validate_register(
    name: &str,
    email: &str,
    password: &str,
    password2: &str,
) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if name.is_empty() {
        errors.set("name", "Name field is required");
    } else if !(2..=30).contains(&name.chars().count()) {
        errors.set("name", "Name must be between 2 and 30 characters");
    }

    if email.is_empty() {
        errors.set("email", "Email field is required");
    } else if !is_valid_email(email) {
        errors.set("email", "Email is invalid");
    }

    collect_password_errors(&mut errors, password, password2);

    errors.into_result("Invalid registration details")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_registration() {
        assert!(validate_register("Alice", "alice@example.com", "Abcd1234!", "Abcd1234!").is_ok());
    }

    #[test]
    fn rejects_short_name_and_bad_email() {
        let err = validate_register("A", "nope", "Abcd1234!", "Abcd1234!").unwrap_err();
        match err {
            DevLinkError::Validation { fields, .. } => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_weak_password_with_field_message() {
        let err =
            validate_register("Alice", "alice@example.com", "password", "password").unwrap_err();
        match err {
            DevLinkError::Validation { fields, .. } => {
                assert!(fields.contains_key("password"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
