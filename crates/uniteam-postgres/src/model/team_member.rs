//! Team membership model and the last-leader rule.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::team_members;
use crate::types::TeamRole;

/// An account's membership in a team.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub account_id: Uuid,
    pub member_role: TeamRole,
    pub joined_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTeamMember {
    pub team_id: Uuid,
    pub account_id: Uuid,
    pub member_role: TeamRole,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateTeamMember {
    pub member_role: Option<TeamRole>,
}

impl TeamMember {
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.member_role.is_leader()
    }

    /// Leaders and co-leaders manage milestones and send invitations.
    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.member_role.has_permission_level_of(TeamRole::CoLeader)
    }
}

impl NewTeamMember {
    pub fn new(team_id: Uuid, account_id: Uuid, member_role: TeamRole) -> Self {
        Self {
            team_id,
            account_id,
            member_role,
        }
    }
}

/// Returns whether changing `member` to `next_role` (or removing it when
/// `next_role` is `None`) would leave its team without a leader.
///
/// `leader_count` must be read under the team row lock.
pub fn leaves_team_leaderless(
    leader_count: i64,
    member: &TeamMember,
    next_role: Option<TeamRole>,
) -> bool {
    let loses_leader = member.is_leader() && next_role.is_none_or(|role| !role.is_leader());
    loses_leader && leader_count <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role: TeamRole) -> TeamMember {
        let now = Timestamp::from(jiff::Timestamp::UNIX_EPOCH);
        TeamMember {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            member_role: role,
            joined_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sole_leader_cannot_step_down_or_leave() {
        let leader = member(TeamRole::Leader);
        assert!(leaves_team_leaderless(1, &leader, Some(TeamRole::Member)));
        assert!(leaves_team_leaderless(1, &leader, Some(TeamRole::CoLeader)));
        assert!(leaves_team_leaderless(1, &leader, None));
        assert!(!leaves_team_leaderless(1, &leader, Some(TeamRole::Leader)));
    }

    #[test]
    fn one_of_several_leaders_may_step_down() {
        let leader = member(TeamRole::Leader);
        assert!(!leaves_team_leaderless(2, &leader, Some(TeamRole::Member)));
        assert!(!leaves_team_leaderless(2, &leader, None));
    }

    #[test]
    fn non_leaders_never_affect_leadership() {
        let co_leader = member(TeamRole::CoLeader);
        assert!(!leaves_team_leaderless(1, &co_leader, None));
        assert!(!leaves_team_leaderless(1, &co_leader, Some(TeamRole::Member)));
        assert!(co_leader.is_coordinator());
        assert!(!member(TeamRole::Member).is_coordinator());
    }
}
