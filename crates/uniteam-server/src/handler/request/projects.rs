//! Project request types.

use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{NewProject, UpdateProject as UpdateProjectModel};
use uuid::Uuid;
use validator::Validate;

use super::validations::{Normalized, double_option};

/// Request payload for creating a project.
///
/// The creator becomes the team leader. When `templateId` is set, the
/// template's milestones are copied into the project, all due on `deadline`.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub course_code: String,

    /// Project deadline, `YYYY-MM-DD`.
    pub deadline: Date,

    /// Supervising lecturer.
    pub supervisor_id: Option<Uuid>,

    /// Template to seed milestones from.
    pub template_id: Option<Uuid>,
}

impl CreateProject {
    pub fn into_model(self, created_by: Uuid) -> NewProject {
        let mut new_project = NewProject::new(self.title, self.deadline);
        new_project.description = self.description.normalized();
        new_project.course_code = self.course_code.normalized();
        new_project.supervisor_id = self.supervisor_id;
        new_project.template_id = self.template_id;
        new_project.created_by = Some(created_by);
        new_project
    }
}

/// Request payload for updating a project. Absent fields are unchanged.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 20))]
    pub course_code: Option<String>,

    pub deadline: Option<Date>,

    /// `null` removes the supervisor.
    #[serde(default, deserialize_with = "double_option")]
    pub supervisor_id: Option<Option<Uuid>>,
}

impl UpdateProject {
    pub fn into_model(self) -> UpdateProjectModel {
        UpdateProjectModel {
            title: self.title.normalized(),
            description: self.description.normalized(),
            course_code: self.course_code.normalized(),
            deadline: self.deadline.map(Into::into),
            supervisor_id: self.supervisor_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn creator_is_recorded() -> anyhow::Result<()> {
        let request: CreateProject = serde_json::from_str(
            r#"{"title":" Compiler ","deadline":"2026-06-01","courseCode":"CS301"}"#,
        )?;
        let creator = Uuid::new_v4();
        let model = request.into_model(creator);

        assert_eq!(model.title, "Compiler");
        assert_eq!(model.created_by, Some(creator));
        assert_eq!(jiff::civil::Date::from(model.deadline), date(2026, 6, 1));
        Ok(())
    }

    #[test]
    fn supervisor_can_be_removed() -> anyhow::Result<()> {
        let request: UpdateProject = serde_json::from_str(r#"{"supervisorId":null}"#)?;
        assert_eq!(request.into_model().supervisor_id, Some(None));
        Ok(())
    }
}
