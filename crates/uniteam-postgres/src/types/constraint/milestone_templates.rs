//! Milestone templates table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Milestone templates table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum MilestoneTemplateConstraints {
    #[strum(serialize = "milestone_templates_title_length")]
    TitleLength,
    #[strum(serialize = "milestone_templates_display_order_min")]
    DisplayOrderMin,
}

impl MilestoneTemplateConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<MilestoneTemplateConstraints> for String {
    #[inline]
    fn from(val: MilestoneTemplateConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for MilestoneTemplateConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
