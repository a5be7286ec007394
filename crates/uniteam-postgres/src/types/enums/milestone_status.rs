//! Milestone progress status.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Progress of a milestone.
///
/// Corresponds to the `MILESTONE_STATUS` PostgreSQL enum. Any status may be
/// set from any other; milestones carry no state machine.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::MilestoneStatus"]
pub enum MilestoneStatus {
    #[db_rename = "pending"]
    #[serde(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    #[default]
    Pending,

    #[db_rename = "in_progress"]
    #[serde(rename = "IN_PROGRESS")]
    #[strum(serialize = "IN_PROGRESS")]
    InProgress,

    #[db_rename = "completed"]
    #[serde(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,

    #[db_rename = "overdue"]
    #[serde(rename = "OVERDUE")]
    #[strum(serialize = "OVERDUE")]
    Overdue,
}

impl MilestoneStatus {
    #[inline]
    pub const fn is_completed(self) -> bool {
        matches!(self, MilestoneStatus::Completed)
    }
}
