//! Milestone assignees table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Milestone assignees table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum MilestoneAssigneeConstraints {
    #[strum(serialize = "milestone_assignees_pkey")]
    MilestoneAccountUnique,
}

impl MilestoneAssigneeConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Uniqueness
    }
}

impl From<MilestoneAssigneeConstraints> for String {
    #[inline]
    fn from(val: MilestoneAssigneeConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for MilestoneAssigneeConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
