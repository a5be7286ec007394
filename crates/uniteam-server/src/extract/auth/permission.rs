//! Team-level permissions and the outcome of a permission check.

use std::borrow::Cow;

use uniteam_postgres::model::TeamMember;
use uniteam_postgres::types::TeamRole;

use crate::handler::{ErrorKind, Result};

/// Actions on a project that are gated by the caller's team role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read the project, its team and its milestones.
    ViewProject,
    /// Send invitations to join the team.
    InviteMembers,
    /// Create, edit and delete milestones.
    ManageMilestones,
    /// Change member roles and remove other members.
    ManageMembers,
    /// Edit the project itself.
    UpdateProject,
    /// Delete the project with everything it owns.
    DeleteProject,
}

impl Permission {
    /// Lowest team role granting the permission.
    ///
    /// `None` means any membership is enough, and that the project supervisor
    /// and administrators are granted it without one.
    pub const fn minimum_role(self) -> Option<TeamRole> {
        match self {
            Permission::ViewProject => None,
            Permission::InviteMembers | Permission::ManageMilestones => Some(TeamRole::CoLeader),
            Permission::ManageMembers | Permission::UpdateProject | Permission::DeleteProject => {
                Some(TeamRole::Leader)
            }
        }
    }

    #[inline]
    pub const fn is_read_only(self) -> bool {
        self.minimum_role().is_none()
    }

    /// Returns whether a member holding `role` is granted the permission.
    pub const fn is_permitted_by_role(self, role: TeamRole) -> bool {
        match self.minimum_role() {
            Some(minimum_role) => role.has_permission_level_of(minimum_role),
            None => true,
        }
    }
}

/// Result of a permission check.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AuthResult {
    pub granted: bool,
    /// Membership of the caller in the checked team, when it has one.
    pub member: Option<TeamMember>,
    pub reason: Option<Cow<'static, str>>,
}

impl AuthResult {
    pub const fn granted() -> Self {
        Self {
            granted: true,
            member: None,
            reason: None,
        }
    }

    pub const fn granted_with_member(member: TeamMember) -> Self {
        Self {
            granted: true,
            member: Some(member),
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            granted: false,
            member: None,
            reason: Some(reason.into()),
        }
    }

    /// Converts a denial into a `forbidden` error.
    pub fn into_result(self) -> Result<Option<TeamMember>> {
        if self.granted {
            return Ok(self.member);
        }

        let error = match self.reason {
            Some(reason) => ErrorKind::Forbidden.with_message(reason),
            None => ErrorKind::Forbidden.into_error(),
        };
        Err(error.with_resource("permission"))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn viewing_needs_any_membership() {
        for role in TeamRole::iter() {
            assert!(Permission::ViewProject.is_permitted_by_role(role));
        }
        assert!(Permission::ViewProject.is_read_only());
    }

    #[test]
    fn coordinators_manage_milestones_and_invitations() {
        for permission in [Permission::InviteMembers, Permission::ManageMilestones] {
            assert!(permission.is_permitted_by_role(TeamRole::Leader));
            assert!(permission.is_permitted_by_role(TeamRole::CoLeader));
            assert!(!permission.is_permitted_by_role(TeamRole::Member));
        }
    }

    #[test]
    fn only_leaders_manage_members_and_the_project() {
        for permission in [
            Permission::ManageMembers,
            Permission::UpdateProject,
            Permission::DeleteProject,
        ] {
            assert!(permission.is_permitted_by_role(TeamRole::Leader));
            assert!(!permission.is_permitted_by_role(TeamRole::CoLeader));
            assert!(!permission.is_permitted_by_role(TeamRole::Member));
            assert!(!permission.is_read_only());
        }
    }

    #[test]
    fn denial_is_forbidden() {
        let error = AuthResult::denied("Not a team member").into_result().err();
        assert_eq!(error.as_ref().map(|e| e.kind()), Some(ErrorKind::Forbidden));
        assert_eq!(error.as_ref().and_then(|e| e.message()), Some("Not a team member"));
    }
}
