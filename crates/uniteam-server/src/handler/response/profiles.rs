//! Profile response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model;
use uuid::Uuid;

/// Role-matched profile, tagged by `profileRole`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "profileRole", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profile {
    Student(StudentProfile),
    Lecturer(LecturerProfile),
    Admin(AdminProfile),
}

impl Profile {
    pub fn from_model(profile: model::Profile) -> Self {
        match profile {
            model::Profile::Student(profile) => Self::Student(StudentProfile::from_model(profile)),
            model::Profile::Lecturer(profile) => {
                Self::Lecturer(LecturerProfile::from_model(profile))
            }
            model::Profile::Admin(profile) => Self::Admin(AdminProfile::from_model(profile)),
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub account_id: Uuid,
    pub personal_email: String,
    pub university: String,
    pub department: String,
    pub course_name: String,
    /// Between 1 and 10 when set.
    pub year_of_study: Option<i32>,
    pub skills: Vec<String>,
    pub bio: String,
    pub updated_at: Timestamp,
}

impl StudentProfile {
    fn from_model(profile: model::StudentProfile) -> Self {
        Self {
            account_id: profile.account_id,
            personal_email: profile.personal_email,
            university: profile.university,
            department: profile.department,
            course_name: profile.course_name,
            year_of_study: profile.year_of_study,
            skills: profile.skills,
            bio: profile.bio,
            updated_at: profile.updated_at.into(),
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LecturerProfile {
    pub account_id: Uuid,
    pub department: String,
    pub courses_taught: Vec<String>,
    pub office_location: String,
    pub research_areas: Vec<String>,
    pub updated_at: Timestamp,
}

impl LecturerProfile {
    fn from_model(profile: model::LecturerProfile) -> Self {
        Self {
            account_id: profile.account_id,
            department: profile.department,
            courses_taught: profile.courses_taught,
            office_location: profile.office_location,
            research_areas: profile.research_areas,
            updated_at: profile.updated_at.into(),
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub account_id: Uuid,
    pub role_title: String,
    pub responsibilities: String,
    pub updated_at: Timestamp,
}

impl AdminProfile {
    fn from_model(profile: model::AdminProfile) -> Self {
        Self {
            account_id: profile.account_id,
            role_title: profile.role_title,
            responsibilities: profile.responsibilities,
            updated_at: profile.updated_at.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_tagged_by_role() -> anyhow::Result<()> {
        let profile = Profile::from_model(model::Profile::Admin(model::AdminProfile {
            account_id: Uuid::nil(),
            role_title: model::DEFAULT_ADMIN_ROLE_TITLE.to_owned(),
            responsibilities: String::new(),
            created_at: Timestamp::UNIX_EPOCH.into(),
            updated_at: Timestamp::UNIX_EPOCH.into(),
        }));

        let json = serde_json::to_value(&profile)?;
        assert_eq!(json["profileRole"], "ADMIN");
        assert_eq!(json["roleTitle"], "System Administrator");
        Ok(())
    }
}
