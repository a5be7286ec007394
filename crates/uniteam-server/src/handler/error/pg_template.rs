//! Template catalog constraint violations.

use uniteam_postgres::types::{MilestoneTemplateConstraints, ProjectTemplateConstraints};

use crate::handler::{Error, ErrorKind};

impl From<ProjectTemplateConstraints> for Error<'static> {
    fn from(c: ProjectTemplateConstraints) -> Self {
        let error = match c {
            ProjectTemplateConstraints::TitleLength => ErrorKind::BadRequest
                .with_message("Template title must be 1 to 200 characters long"),
            ProjectTemplateConstraints::CourseCodeLength => {
                ErrorKind::BadRequest.with_message("Course code must be 1 to 20 characters long")
            }
            ProjectTemplateConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("project_template")
    }
}

impl From<MilestoneTemplateConstraints> for Error<'static> {
    fn from(c: MilestoneTemplateConstraints) -> Self {
        let error = match c {
            MilestoneTemplateConstraints::TitleLength => ErrorKind::BadRequest
                .with_message("Milestone template title must be 1 to 200 characters long"),
            MilestoneTemplateConstraints::DisplayOrderMin => {
                ErrorKind::BadRequest.with_message("Display order cannot be negative")
            }
        };

        error.with_resource("milestone_template")
    }
}
