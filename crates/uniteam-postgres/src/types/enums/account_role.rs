//! System-wide account role and the capabilities it grants.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of an account across the whole system.
///
/// Corresponds to the `ACCOUNT_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AccountRole"]
pub enum AccountRole {
    /// Manages accounts, approves lecturers and sees every project.
    #[db_rename = "admin"]
    #[serde(rename = "ADMIN")]
    #[strum(serialize = "ADMIN")]
    Admin,

    /// Authors templates and supervises projects. Requires approval.
    #[db_rename = "lecturer"]
    #[serde(rename = "LECTURER")]
    #[strum(serialize = "LECTURER")]
    Lecturer,

    /// Forms teams and works on projects.
    #[db_rename = "student"]
    #[serde(rename = "STUDENT")]
    #[strum(serialize = "STUDENT")]
    #[default]
    Student,
}

/// What an account may do regardless of any team membership.
///
/// Derived once per request from [`AccountRole::capabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountCapabilities {
    /// Sees every project, membership, milestone and invitation.
    pub view_all: bool,
    /// Lists, edits, deletes and approves accounts.
    pub manage_accounts: bool,
    /// Adds team memberships directly, bypassing invitations.
    pub manage_memberships: bool,
    /// Creates project templates.
    pub author_templates: bool,
    /// Edits or deletes templates created by someone else.
    pub moderate_templates: bool,
    /// May be named as a project supervisor.
    pub supervise_projects: bool,
    /// May be invited to join a team.
    pub receive_invitations: bool,
}

impl AccountRole {
    /// Returns the capability set granted by this role.
    pub const fn capabilities(self) -> AccountCapabilities {
        match self {
            AccountRole::Admin => AccountCapabilities {
                view_all: true,
                manage_accounts: true,
                manage_memberships: true,
                author_templates: false,
                moderate_templates: true,
                supervise_projects: false,
                receive_invitations: false,
            },
            AccountRole::Lecturer => AccountCapabilities {
                view_all: false,
                manage_accounts: false,
                manage_memberships: false,
                author_templates: true,
                moderate_templates: false,
                supervise_projects: true,
                receive_invitations: false,
            },
            AccountRole::Student => AccountCapabilities {
                view_all: false,
                manage_accounts: false,
                manage_memberships: false,
                author_templates: false,
                moderate_templates: false,
                supervise_projects: false,
                receive_invitations: true,
            },
        }
    }

    /// Approval state a freshly created account of this role starts in.
    #[inline]
    pub const fn default_approval(self) -> bool {
        !matches!(self, AccountRole::Lecturer)
    }

    /// Returns whether accounts of this role go through lecturer approval.
    #[inline]
    pub const fn requires_approval(self) -> bool {
        matches!(self, AccountRole::Lecturer)
    }

    #[inline]
    pub const fn is_admin(self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_lecturers_start_unapproved() {
        assert!(AccountRole::Student.default_approval());
        assert!(AccountRole::Admin.default_approval());
        assert!(!AccountRole::Lecturer.default_approval());
    }

    #[test]
    fn capabilities_are_role_specific() {
        let admin = AccountRole::Admin.capabilities();
        assert!(admin.view_all && admin.manage_accounts && admin.moderate_templates);

        let lecturer = AccountRole::Lecturer.capabilities();
        assert!(lecturer.author_templates && lecturer.supervise_projects);
        assert!(!lecturer.view_all && !lecturer.receive_invitations);

        let student = AccountRole::Student.capabilities();
        assert!(student.receive_invitations);
        assert!(!student.author_templates && !student.manage_accounts);
    }

    #[test]
    fn exactly_one_role_receives_invitations() {
        let receivers = AccountRole::iter()
            .filter(|role| role.capabilities().receive_invitations)
            .collect::<Vec<_>>();
        assert_eq!(receivers, vec![AccountRole::Student]);
    }

    #[test]
    fn only_lecturers_supervise_projects() {
        let supervisors = AccountRole::iter()
            .filter(|role| role.capabilities().supervise_projects)
            .collect::<Vec<_>>();
        assert_eq!(supervisors, vec![AccountRole::Lecturer]);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("LECTURER".parse::<AccountRole>().ok(), Some(AccountRole::Lecturer));
        assert!("lecturer".parse::<AccountRole>().is_err());
        assert_eq!(AccountRole::Admin.to_string(), "ADMIN");
    }
}
