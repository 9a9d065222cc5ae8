//! Post and comment text validation

use crate::types::DevLinkError;
use crate::validation::FieldErrors;

/// Validate a post or comment body (10-300 characters)
pub fn validate_post_text(text: &str) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if text.is_empty() {
        errors.set("text", "Text field is required");
    } else if !(10..=300).contains(&text.chars().count()) {
        errors.set("text", "Post must be between 10 and 300 characters");
    }

    errors.into_result("Invalid post details")
}
