//! Profile input validation

use crate::types::DevLinkError;
use crate::validation::{is_absolute_url, FieldErrors};

/// Borrowed view of the profile fields that need validation
pub struct ProfileFields<'a> {
    pub handle: &'a str,
    pub status: &'a str,
    pub skills: &'a str,
    pub website: Option<&'a str>,
    pub youtube: Option<&'a str>,
    pub twitter: Option<&'a str>,
    pub facebook: Option<&'a str>,
    pub linkedin: Option<&'a str>,
    pub instagram: Option<&'a str>,
}

const URL_MESSAGE: &str = "Enter a valid url including http:// or https://";

/// Validate profile edit details
pub fn validate_profile(fields: &ProfileFields<'_>) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if fields.handle.is_empty() {
        errors.set("handle", "Profile handle is required");
    } else if !(2..=40).contains(&fields.handle.chars().count()) {
        errors.set("handle", "Handle must be between 2 and 40 characters");
    }

    if fields.status.is_empty() {
        errors.set("status", "Status field is required");
    }

    if fields.skills.is_empty() {
        errors.set("skills", "Skills field is required");
    }

    let urls = [
        ("website", fields.website),
        ("youtube", fields.youtube),
        ("twitter", fields.twitter),
        ("facebook", fields.facebook),
        ("linkedin", fields.linkedin),
        ("instagram", fields.instagram),
    ];
    for (field, value) in urls {
        if let Some(url) = value {
            if !url.is_empty() && !is_absolute_url(url) {
                errors.set(field, URL_MESSAGE);
            }
        }
    }

    errors.into_result("Invalid profile details")
}

/// Split a comma-separated skills string into a trimmed, non-empty list
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
