//! Experience and education entry validation

use crate::types::DevLinkError;
use crate::validation::FieldErrors;

/// Borrowed view of the required experience fields
pub struct ExperienceFields<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub from: &'a str,
}

/// Borrowed view of the required education fields
pub struct EducationFields<'a> {
    pub school: &'a str,
    pub degree: &'a str,
    pub fieldofstudy: &'a str,
    pub from: &'a str,
}

/// Validate the required experience fields
pub fn validate_experience(fields: &ExperienceFields<'_>) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if fields.title.is_empty() {
        errors.set("title", "Job title field is required");
    }
    if fields.company.is_empty() {
        errors.set("company", "Company field is required");
    }
    if fields.from.is_empty() {
        errors.set("from", "From date field is required");
    }

    errors.into_result("Invalid experience details")
}

/// Validate the required education fields
pub fn validate_education(fields: &EducationFields<'_>) -> Result<(), DevLinkError> {
    let mut errors = FieldErrors::default();

    if fields.school.is_empty() {
        errors.set("school", "School field is required");
    }
    if fields.degree.is_empty() {
        errors.set("degree", "Degree field is required");
    }
    if fields.fieldofstudy.is_empty() {
        errors.set("fieldofstudy", "Field of study field is required");
    }
    if fields.from.is_empty() {
        errors.set("from", "From date field is required");
    }

    errors.into_result("Invalid education details")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_requires_title_company_from() {
        assert!(validate_experience(&ExperienceFields {
            title: "Engineer",
            company: "Acme",
            from: "2020-01-01",
        })
        .is_ok());

        let err = validate_experience(&ExperienceFields {
            title: "",
            company: "",
            from: "",
        })
        .unwrap_err();
        match err {
            DevLinkError::Validation { fields, .. } => {
                assert_eq!(fields.len(), 3);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn education_requires_all_text_fields() {
        assert!(validate_education(&EducationFields {
            school: "MIT",
            degree: "BSc",
            fieldofstudy: "CS",
            from: "2016-09-01",
        })
        .is_ok());

        assert!(validate_education(&EducationFields {
            school: "",
            degree: "BSc",
            fieldofstudy: "CS",
            from: "2016-09-01",
        })
        .is_err());
    }
}
