//! Database constraint violations grouped by table.

mod accounts;
mod invitations;
mod milestone_assignees;
mod milestone_templates;
mod milestones;
mod profiles;
mod project_templates;
mod projects;
mod team_members;
mod teams;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::accounts::AccountConstraints;
pub use self::invitations::InvitationConstraints;
pub use self::milestone_assignees::MilestoneAssigneeConstraints;
pub use self::milestone_templates::MilestoneTemplateConstraints;
pub use self::milestones::MilestoneConstraints;
pub use self::profiles::ProfileConstraints;
pub use self::project_templates::ProjectTemplateConstraints;
pub use self::projects::ProjectConstraints;
pub use self::team_members::TeamMemberConstraints;
pub use self::teams::TeamConstraints;

/// Any known constraint, tagged with the table that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    Profile(ProfileConstraints),

    ProjectTemplate(ProjectTemplateConstraints),
    MilestoneTemplate(MilestoneTemplateConstraints),

    Project(ProjectConstraints),
    Team(TeamConstraints),
    TeamMember(TeamMemberConstraints),
    Milestone(MilestoneConstraints),
    MilestoneAssignee(MilestoneAssigneeConstraints),
    Invitation(InvitationConstraints),
}

/// Broad kind of a constraint violation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Format, length or range checks.
    Validation,
    /// Ordering between timestamps.
    Chronological,
    /// Domain rules expressed in the schema.
    BusinessLogic,
    /// Primary keys and unique indexes.
    Uniqueness,
}

impl ConstraintViolation {
    /// Parses the constraint name reported by PostgreSQL.
    ///
    /// ```
    /// use uniteam_postgres::types::{ConstraintViolation, TeamMemberConstraints};
    ///
    /// assert_eq!(
    ///     ConstraintViolation::new("team_members_team_account_unique_idx"),
    ///     Some(ConstraintViolation::TeamMember(TeamMemberConstraints::TeamAccountUnique)),
    /// );
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "accounts" => try_parse!(AccountConstraints::new => Account),
            "student" | "lecturer" | "admin" => try_parse!(ProfileConstraints::new => Profile),
            "project" => try_parse!(ProjectTemplateConstraints::new => ProjectTemplate),
            "projects" => try_parse!(ProjectConstraints::new => Project),
            "teams" => try_parse!(TeamConstraints::new => Team),
            "team" => try_parse!(TeamMemberConstraints::new => TeamMember),
            "milestones" => try_parse!(MilestoneConstraints::new => Milestone),
            "milestone" => try_parse! {
                MilestoneTemplateConstraints::new => MilestoneTemplate,
                MilestoneAssigneeConstraints::new => MilestoneAssignee,
            },
            "invitations" => try_parse!(InvitationConstraints::new => Invitation),
            _ => None,
        }
    }

    /// Returns the table that owns the constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Account(_) => "accounts",
            ConstraintViolation::Profile(c) => c.table_name(),
            ConstraintViolation::ProjectTemplate(_) => "project_templates",
            ConstraintViolation::MilestoneTemplate(_) => "milestone_templates",
            ConstraintViolation::Project(_) => "projects",
            ConstraintViolation::Team(_) => "teams",
            ConstraintViolation::TeamMember(_) => "team_members",
            ConstraintViolation::Milestone(_) => "milestones",
            ConstraintViolation::MilestoneAssignee(_) => "milestone_assignees",
            ConstraintViolation::Invitation(_) => "invitations",
        }
    }

    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
            ConstraintViolation::Profile(c) => c.categorize(),
            ConstraintViolation::ProjectTemplate(c) => c.categorize(),
            ConstraintViolation::MilestoneTemplate(c) => c.categorize(),
            ConstraintViolation::Project(c) => c.categorize(),
            ConstraintViolation::Team(c) => c.categorize(),
            ConstraintViolation::TeamMember(c) => c.categorize(),
            ConstraintViolation::Milestone(c) => c.categorize(),
            ConstraintViolation::MilestoneAssignee(c) => c.categorize(),
            ConstraintViolation::Invitation(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Account(c) => write!(f, "{c}"),
            ConstraintViolation::Profile(c) => write!(f, "{c}"),
            ConstraintViolation::ProjectTemplate(c) => write!(f, "{c}"),
            ConstraintViolation::MilestoneTemplate(c) => write!(f, "{c}"),
            ConstraintViolation::Project(c) => write!(f, "{c}"),
            ConstraintViolation::Team(c) => write!(f, "{c}"),
            ConstraintViolation::TeamMember(c) => write!(f, "{c}"),
            ConstraintViolation::Milestone(c) => write!(f, "{c}"),
            ConstraintViolation::MilestoneAssignee(c) => write!(f, "{c}"),
            ConstraintViolation::Invitation(c) => write!(f, "{c}"),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_by_table_prefix() {
        assert_eq!(
            ConstraintViolation::new("invitations_project_receiver_unique"),
            Some(ConstraintViolation::Invitation(
                InvitationConstraints::ProjectReceiverUnique
            ))
        );
        assert_eq!(
            ConstraintViolation::new("milestone_templates_display_order_min"),
            Some(ConstraintViolation::MilestoneTemplate(
                MilestoneTemplateConstraints::DisplayOrderMin
            ))
        );
        assert_eq!(
            ConstraintViolation::new("lecturer_profiles_tags_size"),
            Some(ConstraintViolation::Profile(
                ProfileConstraints::LecturerTagsSize
            ))
        );
        assert_eq!(ConstraintViolation::new("projects_unknown_check"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn every_constraint_round_trips_through_its_name() {
        let names = AccountConstraints::iter()
            .map(|c| c.to_string())
            .chain(ProfileConstraints::iter().map(|c| c.to_string()))
            .chain(ProjectTemplateConstraints::iter().map(|c| c.to_string()))
            .chain(MilestoneTemplateConstraints::iter().map(|c| c.to_string()))
            .chain(ProjectConstraints::iter().map(|c| c.to_string()))
            .chain(TeamConstraints::iter().map(|c| c.to_string()))
            .chain(TeamMemberConstraints::iter().map(|c| c.to_string()))
            .chain(MilestoneConstraints::iter().map(|c| c.to_string()))
            .chain(MilestoneAssigneeConstraints::iter().map(|c| c.to_string()))
            .chain(InvitationConstraints::iter().map(|c| c.to_string()));

        for name in names {
            let violation = ConstraintViolation::new(&name);
            assert!(violation.is_some(), "unparsed constraint {name}");
            assert_eq!(violation.map(|v| v.to_string()), Some(name));
        }
    }

    #[test]
    fn categories_and_tables() {
        let duplicate = ConstraintViolation::Account(AccountConstraints::EmailAddressUnique);
        assert_eq!(duplicate.constraint_category(), ConstraintCategory::Uniqueness);
        assert_eq!(duplicate.table_name(), "accounts");

        let year = ConstraintViolation::Profile(ProfileConstraints::StudentYearOfStudyRange);
        assert_eq!(year.constraint_category(), ConstraintCategory::Validation);
        assert_eq!(year.table_name(), "student_profiles");
    }

    #[test]
    fn serializes_as_constraint_name() -> serde_json::Result<()> {
        let violation = ConstraintViolation::TeamMember(TeamMemberConstraints::TeamAccountUnique);
        let json = serde_json::to_string(&violation)?;
        assert_eq!(json, "\"team_members_team_account_unique_idx\"");
        Ok(())
    }
}
