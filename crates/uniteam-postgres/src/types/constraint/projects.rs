//! Projects table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Projects table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProjectConstraints {
    #[strum(serialize = "projects_title_length")]
    TitleLength,
    #[strum(serialize = "projects_course_code_length")]
    CourseCodeLength,
    #[strum(serialize = "projects_updated_after_created")]
    UpdatedAfterCreated,
}

impl ProjectConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ProjectConstraints::TitleLength | ProjectConstraints::CourseCodeLength => ConstraintCategory::Validation,
            ProjectConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<ProjectConstraints> for String {
    #[inline]
    fn from(val: ProjectConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProjectConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
