//! Project, team, milestone and invitation constraint violations.

use uniteam_postgres::types::{
    InvitationConstraints, MilestoneAssigneeConstraints, MilestoneConstraints,
    ProjectConstraints, TeamConstraints, TeamMemberConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<ProjectConstraints> for Error<'static> {
    fn from(c: ProjectConstraints) -> Self {
        let error = match c {
            ProjectConstraints::TitleLength => {
                ErrorKind::BadRequest.with_message("Project title must be 1 to 200 characters long")
            }
            ProjectConstraints::CourseCodeLength => {
                ErrorKind::BadRequest.with_message("Course code cannot exceed 20 characters")
            }
            ProjectConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("project")
    }
}

impl From<TeamConstraints> for Error<'static> {
    fn from(c: TeamConstraints) -> Self {
        let error = match c {
            TeamConstraints::ProjectIdUnique => {
                ErrorKind::Conflict.with_message("The project already has a team")
            }
        };

        error.with_resource("team")
    }
}

impl From<TeamMemberConstraints> for Error<'static> {
    fn from(c: TeamMemberConstraints) -> Self {
        let error = match c {
            TeamMemberConstraints::UpdatedAfterJoined => ErrorKind::InternalServerError.into_error(),
            TeamMemberConstraints::TeamAccountUnique => {
                ErrorKind::Conflict.with_message("The account is already a member of this team")
            }
        };

        error.with_resource("team_member")
    }
}

impl From<MilestoneConstraints> for Error<'static> {
    fn from(c: MilestoneConstraints) -> Self {
        let error = match c {
            MilestoneConstraints::TitleLength => ErrorKind::BadRequest
                .with_message("Milestone title must be 1 to 200 characters long"),
            MilestoneConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("milestone")
    }
}

impl From<MilestoneAssigneeConstraints> for Error<'static> {
    fn from(c: MilestoneAssigneeConstraints) -> Self {
        let error = match c {
            MilestoneAssigneeConstraints::MilestoneAccountUnique => {
                ErrorKind::BadRequest.with_message("An account is listed as assignee twice")
            }
        };

        error.with_resource("milestone")
    }
}

impl From<InvitationConstraints> for Error<'static> {
    fn from(c: InvitationConstraints) -> Self {
        let error = match c {
            InvitationConstraints::SenderReceiverDistinct => {
                ErrorKind::BadRequest.with_message("You cannot invite yourself")
            }
            InvitationConstraints::RespondedStatus
            | InvitationConstraints::RespondedAfterSent => {
                ErrorKind::InternalServerError.into_error()
            }
            InvitationConstraints::ProjectReceiverUnique => ErrorKind::BadRequest
                .with_message("This student has already been invited to the project"),
        };

        error.with_resource("invitation")
    }
}
