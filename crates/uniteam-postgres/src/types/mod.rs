//! Domain types shared by models, queries and the HTTP layer.

mod constraint;
mod enums;
mod pagination;
mod scope;

pub use constraint::{
    AccountConstraints, ConstraintCategory, ConstraintViolation, InvitationConstraints,
    MilestoneAssigneeConstraints, MilestoneConstraints, MilestoneTemplateConstraints,
    ProfileConstraints, ProjectConstraints, ProjectTemplateConstraints, TeamConstraints,
    TeamMemberConstraints,
};
pub use enums::{AccountCapabilities, AccountRole, InvitationStatus, MilestoneStatus, TeamRole};
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, Pagination};
pub use scope::AccessScope;
