//! Project and milestone template request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{
    NewMilestoneTemplate, NewProjectTemplate, UpdateMilestoneTemplate as UpdateMilestoneTemplateModel,
    UpdateProjectTemplate as UpdateProjectTemplateModel,
};
use uuid::Uuid;
use validator::Validate;

use super::validations::Normalized;

/// One step of a template created inline with its project template.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStep {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    /// Ascending position, `0` or more. Steps may share a position.
    #[validate(range(min = 0))]
    #[serde(default)]
    pub display_order: i32,
}

impl TemplateStep {
    pub fn into_model(self, project_template_id: Uuid) -> NewMilestoneTemplate {
        NewMilestoneTemplate {
            project_template_id,
            title: self.title.normalized(),
            description: self.description.normalized(),
            display_order: self.display_order,
        }
    }
}

/// Request payload for creating a project template.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTemplate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub course_code: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    /// Steps created together with the template.
    #[validate(length(max = 100), nested)]
    #[serde(default)]
    pub milestone_templates: Vec<TemplateStep>,
}

impl CreateProjectTemplate {
    pub fn into_model(self, created_by: Uuid) -> (NewProjectTemplate, Vec<TemplateStep>) {
        let new_template = NewProjectTemplate {
            created_by,
            title: self.title.normalized(),
            course_code: self.course_code.normalized(),
            description: self.description.normalized(),
        };
        (new_template, self.milestone_templates)
    }
}

#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectTemplate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 20))]
    pub course_code: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

impl UpdateProjectTemplate {
    pub fn into_model(self) -> UpdateProjectTemplateModel {
        UpdateProjectTemplateModel {
            title: self.title.normalized(),
            course_code: self.course_code.normalized(),
            description: self.description.normalized(),
        }
    }
}

/// Request payload for adding a step to an existing project template.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneTemplate {
    pub project_template_id: Uuid,

    #[serde(flatten)]
    #[validate(nested)]
    pub step: TemplateStep,
}

impl CreateMilestoneTemplate {
    pub fn into_model(self) -> NewMilestoneTemplate {
        self.step.into_model(self.project_template_id)
    }
}

#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneTemplate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub display_order: Option<i32>,
}

impl UpdateMilestoneTemplate {
    pub fn into_model(self) -> UpdateMilestoneTemplateModel {
        UpdateMilestoneTemplateModel {
            title: self.title.normalized(),
            description: self.description.normalized(),
            display_order: self.display_order,
        }
    }
}

/// Optional course filter for the project template list.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplateFilter {
    pub course_code: Option<String>,
}

/// Optional parent filter for the milestone template list.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTemplateFilter {
    pub project_template_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn inline_steps_are_validated() -> anyhow::Result<()> {
        let request: CreateProjectTemplate = serde_json::from_str(
            r#"{"title":"Capstone","milestoneTemplates":[{"title":"Proposal","displayOrder":-1}]}"#,
        )?;
        assert!(request.validate().is_err());
        Ok(())
    }

    #[test]
    fn flattened_step_fields() -> anyhow::Result<()> {
        let template_id = Uuid::new_v4();
        let request: CreateMilestoneTemplate = serde_json::from_value(serde_json::json!({
            "projectTemplateId": template_id,
            "title": " Report ",
            "displayOrder": 2,
        }))?;
        assert!(request.validate().is_ok());

        let model = request.into_model();
        assert_eq!(model.project_template_id, template_id);
        assert_eq!(model.title, "Report");
        assert_eq!(model.display_order, 2);
        Ok(())
    }
}
