//! Teams table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Teams table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum TeamConstraints {
    #[strum(serialize = "teams_project_id_unique_idx")]
    ProjectIdUnique,
}

impl TeamConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Uniqueness
    }
}

impl From<TeamConstraints> for String {
    #[inline]
    fn from(val: TeamConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for TeamConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
