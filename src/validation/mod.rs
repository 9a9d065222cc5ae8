//! Input validation for resolver arguments
//!
//! Validators accumulate per-field messages the way the browser forms
//! expect them: one message per field name, all surfaced together in a
//! single `ValidationError` with a `fields` extension.

pub mod dates;
pub mod entries;
pub mod login;
pub mod post;
pub mod profile;
pub mod pwreset;
pub mod register;

use std::collections::BTreeMap;

use crate::types::DevLinkError;

pub use dates::{parse_date, validate_entry_dates};
pub use entries::{
    validate_education, validate_experience, EducationFields, ExperienceFields,
};
pub use login::validate_login;
pub use post::validate_post_text;
pub use profile::{split_skills, validate_profile, ProfileFields};
pub use pwreset::{validate_email_input, validate_new_password};
pub use register::validate_register;

/// Accumulated field-level validation messages
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finish validation: empty map is success, otherwise a ValidationError
    pub fn into_result(self, message: &str) -> Result<(), DevLinkError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DevLinkError::Validation {
                message: message.to_string(),
                fields: self.0,
            })
        }
    }
}

/// Minimal email shape check: non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Absolute-URL check: http(s) scheme plus a non-empty host
pub fn is_absolute_url(url: &str) -> bool {
    let rest = if let Some(rest) = url.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        return false;
    };

    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty() && !host.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[test]
    fn absolute_url_check() {
        assert!(is_absolute_url("https://www.example.com"));
        assert!(is_absolute_url("http://example.com/path?q=1"));
        assert!(!is_absolute_url("www.example.com"));
        assert!(!is_absolute_url("ftp://example.com"));
        assert!(!is_absolute_url("https://"));
    }
}
