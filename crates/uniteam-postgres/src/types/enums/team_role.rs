//! Team membership role.

use std::cmp;

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of an account within a project team, ordered by privilege
/// `Leader > CoLeader > Member`.
///
/// Corresponds to the `TEAM_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::TeamRole"]
pub enum TeamRole {
    /// Owns the project; every team keeps at least one.
    #[db_rename = "leader"]
    #[serde(rename = "LEADER")]
    #[strum(serialize = "LEADER")]
    Leader,

    /// Manages milestones and invitations alongside the leaders.
    #[db_rename = "co_leader"]
    #[serde(rename = "CO_LEADER")]
    #[strum(serialize = "CO_LEADER")]
    CoLeader,

    #[db_rename = "member"]
    #[serde(rename = "MEMBER")]
    #[strum(serialize = "MEMBER")]
    #[default]
    Member,
}

impl TeamRole {
    /// Higher means more privileged.
    #[inline]
    pub const fn hierarchy_level(self) -> u8 {
        match self {
            TeamRole::Member => 1,
            TeamRole::CoLeader => 2,
            TeamRole::Leader => 3,
        }
    }

    /// Returns whether this role is at least as privileged as `other`.
    #[inline]
    pub const fn has_permission_level_of(self, other: TeamRole) -> bool {
        self.hierarchy_level() >= other.hierarchy_level()
    }

    #[inline]
    pub const fn is_leader(self) -> bool {
        matches!(self, TeamRole::Leader)
    }
}

impl PartialOrd for TeamRole {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TeamRole {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.hierarchy_level().cmp(&other.hierarchy_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_privilege() {
        assert!(TeamRole::Leader > TeamRole::CoLeader);
        assert!(TeamRole::CoLeader > TeamRole::Member);
        assert!(TeamRole::Leader.has_permission_level_of(TeamRole::CoLeader));
        assert!(!TeamRole::Member.has_permission_level_of(TeamRole::CoLeader));
    }

    #[test]
    fn rejects_malformed_role() {
        assert!("OWNER".parse::<TeamRole>().is_err());
        assert_eq!("CO_LEADER".parse::<TeamRole>().ok(), Some(TeamRole::CoLeader));
    }
}
