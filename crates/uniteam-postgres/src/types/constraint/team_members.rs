//! Team members table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Team members table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum TeamMemberConstraints {
    #[strum(serialize = "team_members_updated_after_joined")]
    UpdatedAfterJoined,
    #[strum(serialize = "team_members_team_account_unique_idx")]
    TeamAccountUnique,
}

impl TeamMemberConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            TeamMemberConstraints::UpdatedAfterJoined => ConstraintCategory::Chronological,
            TeamMemberConstraints::TeamAccountUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<TeamMemberConstraints> for String {
    #[inline]
    fn from(val: TeamMemberConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for TeamMemberConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
