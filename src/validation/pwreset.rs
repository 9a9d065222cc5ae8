//! Password policy and reset-flow validation
//!
//! The policy applies to both registration and password reset: 8-32
//! characters with at least one lowercase letter, one uppercase letter,
//! one digit, and one symbol from the special set.

use crate::types::DevLinkError;
use crate::validation::{is_valid_email, FieldErrors};

/// Symbols accepted by the password policy
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|~`";

/// Policy violation message for a candidate password, if any
pub fn password_policy_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("Password field is required");
    }
    let len = password.chars().count();
    if !(8..=32).contains(&len) {
        return Some("Password must be between 8 and 32 characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain a digit");
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Some("Password must contain a special character");
    }
    None
}

/// Validate the forgot-password email input
pub fn validate_email_input(email: &str) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if email.is_empty() {
        errors.set("email", "Email field is required");
    } else if !is_valid_email(email) {
        errors.set("email", "Email is invalid");
    }

    errors.into_result("Invalid email")
}

/// Validate a new password and its confirmation (register + reset)
pub fn validate_new_password(password: &str, password2: &str) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();
    collect_password_errors(&mut errors, password, password2);
    errors.into_result("Invalid password details")
}

pub(crate) fn collect_password_errors(errors: &mut FieldErrors, password: &str, password2: &str) {
    if let Some(message) = password_policy_error(password) {
        errors.set("password", message);
    }

    if password2.is_empty() {
        errors.set("password2", "Confirm Password field is required");
    } else if password != password2 {
        errors.set("password2", "Passwords must match");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_password_meeting_all_classes() {
        assert_eq!(password_policy_error("Abcd1234!"), None);
        assert_eq!(password_policy_error("xY9?abcd"), None);
    }

    #[test]
    fn rejects_missing_character_classes() {
        // no uppercase
        assert!(password_policy_error("abcd1234!").is_some());
        // no lowercase
        assert!(password_policy_error("ABCD1234!").is_some());
        // no digit
        assert!(password_policy_error("Abcdefgh!").is_some());
        // no symbol
        assert!(password_policy_error("Abcd12345").is_some());
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(password_policy_error("Ab1!").is_some());
        let long = format!("Ab1!{}", "x".repeat(40));
        assert!(password_policy_error(&long).is_some());
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_new_password("Abcd1234!", "Abcd1234!").is_ok());
        assert!(validate_new_password("Abcd1234!", "Abcd1234?").is_err());
        assert!(validate_new_password("Abcd1234!", "").is_err());
    }

    #[test]
    fn email_input_validation() {
        assert!(validate_email_input("alice@example.com").is_ok());
        assert!(validate_email_input("").is_err());
        assert!(validate_email_input("not-an-email").is_err());
    }
}
