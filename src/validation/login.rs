//! Login input validation

use crate::types::DevLinkError;
use crate::validation::{is_valid_email, FieldErrors};

/// Validate login details (shape only; credential checks happen later)
pub fn validate_login(email: &str, password: &str) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if email.is_empty() {
        errors.set("email", "Email field is required");
    } else if !is_valid_email(email) {
        errors.set("email", "Email is invalid");
    }

    if password.is_empty() {
        errors.set("password", "Password field is required");
    }

    errors.into_result("Invalid login details")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_login() {
        assert!(validate_login("alice@example.com", "whatever").is_ok());
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(validate_login("", "").is_err());
        assert!(validate_login("alice@example.com", "").is_err());
        assert!(validate_login("bad-email", "pw").is_err());
    }
}
