//! Database models: one `Queryable` row type per table plus the matching
//! `Insertable` and `AsChangeset` structs.

mod account;
mod invitation;
mod milestone;
mod profile;
mod project;
mod project_template;
mod team_member;

pub use account::{Account, NewAccount, UpdateAccount};
pub use invitation::{Invitation, NewInvitation, UpdateInvitation};
pub use milestone::{
    Milestone, MilestoneAssignee, NewMilestone, NewMilestoneAssignee, UpdateMilestone,
    unassignable_accounts,
};
pub use profile::{
    AdminProfile, DEFAULT_ADMIN_ROLE_TITLE, LecturerProfile, NewAdminProfile, NewLecturerProfile, NewProfile,
    NewStudentProfile, Profile, StudentProfile, UpdateAdminProfile, UpdateLecturerProfile,
    UpdateStudentProfile,
};
pub use project::{NewProject, NewTeam, Project, Team, UpdateProject};
pub use project_template::{
    MilestoneTemplate, NewMilestoneTemplate, NewProjectTemplate, ProjectTemplate,
    UpdateMilestoneTemplate, UpdateProjectTemplate, instantiate_milestones,
};
pub use team_member::{NewTeamMember, TeamMember, UpdateTeamMember, leaves_team_leaderless};
