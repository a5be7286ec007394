//! Project templates table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Project templates table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProjectTemplateConstraints {
    #[strum(serialize = "project_templates_title_length")]
    TitleLength,
    #[strum(serialize = "project_templates_course_code_length")]
    CourseCodeLength,
    #[strum(serialize = "project_templates_updated_after_created")]
    UpdatedAfterCreated,
}

impl ProjectTemplateConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ProjectTemplateConstraints::TitleLength
            | ProjectTemplateConstraints::CourseCodeLength => ConstraintCategory::Validation,
            ProjectTemplateConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<ProjectTemplateConstraints> for String {
    #[inline]
    fn from(val: ProjectTemplateConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProjectTemplateConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
