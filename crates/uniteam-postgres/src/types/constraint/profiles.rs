//! Student, lecturer and admin profile constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Student, lecturer and admin profile constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProfileConstraints {
    #[strum(serialize = "student_profiles_year_of_study_range")]
    StudentYearOfStudyRange,
    #[strum(serialize = "student_profiles_bio_length")]
    StudentBioLength,
    #[strum(serialize = "student_profiles_skills_size")]
    StudentSkillsSize,
    #[strum(serialize = "lecturer_profiles_office_location_length")]
    LecturerOfficeLocationLength,
    #[strum(serialize = "lecturer_profiles_tags_size")]
    LecturerTagsSize,
    #[strum(serialize = "admin_profiles_role_title_length")]
    AdminRoleTitleLength,
}

impl ProfileConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the profile table that owns the constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ProfileConstraints::StudentYearOfStudyRange
            | ProfileConstraints::StudentBioLength
            | ProfileConstraints::StudentSkillsSize => "student_profiles",
            ProfileConstraints::LecturerOfficeLocationLength
            | ProfileConstraints::LecturerTagsSize => "lecturer_profiles",
            ProfileConstraints::AdminRoleTitleLength => "admin_profiles",
        }
    }

    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<ProfileConstraints> for String {
    #[inline]
    fn from(val: ProfileConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProfileConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
