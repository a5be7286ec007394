//! Milestones table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Milestones table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum MilestoneConstraints {
    #[strum(serialize = "milestones_title_length")]
    TitleLength,
    #[strum(serialize = "milestones_updated_after_created")]
    UpdatedAfterCreated,
}

impl MilestoneConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            MilestoneConstraints::TitleLength => ConstraintCategory::Validation,
            MilestoneConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<MilestoneConstraints> for String {
    #[inline]
    fn from(val: MilestoneConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for MilestoneConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
