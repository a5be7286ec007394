//! Profile update request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{UpdateAdminProfile, UpdateLecturerProfile, UpdateStudentProfile};
use validator::Validate;

use super::validations::{Normalized, double_option, has_no_blank_tags};

/// Request payload for updating the caller's own profile.
///
/// Only the fields of the caller's role are applied; `department` is shared
/// by students and lecturers.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "is_year_of_study"))]
pub struct UpdateProfile {
    // Student fields.
    #[validate(email, length(max = 254))]
    pub personal_email: Option<String>,
    #[validate(length(max = 200))]
    pub university: Option<String>,
    #[validate(length(max = 200))]
    pub course_name: Option<String>,
    /// Between 1 and 10; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub year_of_study: Option<Option<i32>>,
    #[validate(length(max = 50), custom(function = "has_no_blank_tags"))]
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    // Student and lecturer field.
    #[validate(length(max = 200))]
    pub department: Option<String>,

    // Lecturer fields.
    #[validate(length(max = 50), custom(function = "has_no_blank_tags"))]
    pub courses_taught: Option<Vec<String>>,
    #[validate(length(max = 200))]
    pub office_location: Option<String>,
    #[validate(length(max = 50), custom(function = "has_no_blank_tags"))]
    pub research_areas: Option<Vec<String>>,

    // Administrator fields.
    #[validate(length(min = 1, max = 100))]
    pub role_title: Option<String>,
    #[validate(length(max = 2000))]
    pub responsibilities: Option<String>,
}

fn is_year_of_study(profile: &UpdateProfile) -> Result<(), validator::ValidationError> {
    match profile.year_of_study {
        Some(Some(year)) if !(1..=10).contains(&year) => Err(super::validations::validation_error(
            "range",
            "Year of study must be between 1 and 10",
        )),
        _ => Ok(()),
    }
}

impl UpdateProfile {
    pub fn into_student(self) -> UpdateStudentProfile {
        UpdateStudentProfile {
            personal_email: self.personal_email.map(|email| email.trim().to_lowercase()),
            university: self.university.normalized(),
            department: self.department.normalized(),
            course_name: self.course_name.normalized(),
            year_of_study: self.year_of_study,
            skills: self.skills.normalized(),
            bio: self.bio.normalized(),
        }
    }

    pub fn into_lecturer(self) -> UpdateLecturerProfile {
        UpdateLecturerProfile {
            department: self.department.normalized(),
            courses_taught: self.courses_taught.normalized(),
            office_location: self.office_location.normalized(),
            research_areas: self.research_areas.normalized(),
        }
    }

    pub fn into_admin(self) -> UpdateAdminProfile {
        UpdateAdminProfile {
            role_title: self.role_title.normalized(),
            responsibilities: self.responsibilities.normalized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn year_of_study_is_bounded() -> anyhow::Result<()> {
        let valid: UpdateProfile = serde_json::from_str(r#"{"yearOfStudy":3}"#)?;
        let cleared: UpdateProfile = serde_json::from_str(r#"{"yearOfStudy":null}"#)?;
        let invalid: UpdateProfile = serde_json::from_str(r#"{"yearOfStudy":11}"#)?;

        assert!(valid.validate().is_ok());
        assert!(cleared.validate().is_ok());
        assert!(invalid.validate().is_err());
        Ok(())
    }

    #[test]
    fn role_specific_projection() -> anyhow::Result<()> {
        let request: UpdateProfile = serde_json::from_str(
            r#"{"department":" Computing ","skills":["rust"],"officeLocation":"B12"}"#,
        )?;
        assert!(request.validate().is_ok());

        let student = request.into_student();
        assert_eq!(student.department.as_deref(), Some("Computing"));
        assert_eq!(student.skills, Some(vec!["rust".to_owned()]));
        Ok(())
    }
}
