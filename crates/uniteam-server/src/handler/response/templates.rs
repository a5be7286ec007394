//! Project and milestone template response types.

use std::collections::HashMap;

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model;
use uuid::Uuid;

/// Represents a milestone blueprint.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTemplate {
    pub milestone_template_id: Uuid,
    pub project_template_id: Uuid,
    pub title: String,
    pub description: String,
    /// Position among the template's milestones, ascending.
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MilestoneTemplate {
    pub fn from_model(step: model::MilestoneTemplate) -> Self {
        Self {
            milestone_template_id: step.id,
            project_template_id: step.project_template_id,
            title: step.title,
            description: step.description,
            display_order: step.display_order,
            created_at: step.created_at.into(),
            updated_at: step.updated_at.into(),
        }
    }
}

/// List of milestone templates.
pub type MilestoneTemplates = Vec<MilestoneTemplate>;

/// Represents a project blueprint with its ordered milestone templates.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub template_id: Uuid,
    /// Lecturer who authored the template.
    pub created_by: Uuid,
    pub title: String,
    pub course_code: String,
    pub description: String,
    pub milestone_templates: Vec<MilestoneTemplate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectTemplate {
    /// `steps` must already be in display order.
    pub fn from_model(
        template: model::ProjectTemplate,
        steps: Vec<model::MilestoneTemplate>,
    ) -> Self {
        Self {
            template_id: template.id,
            created_by: template.created_by,
            title: template.title,
            course_code: template.course_code,
            description: template.description,
            milestone_templates: steps.into_iter().map(MilestoneTemplate::from_model).collect(),
            created_at: template.created_at.into(),
            updated_at: template.updated_at.into(),
        }
    }

    /// Distributes `steps` over their templates, keeping their order.
    pub fn from_models(
        templates: Vec<model::ProjectTemplate>,
        steps: Vec<model::MilestoneTemplate>,
    ) -> Vec<Self> {
        let mut grouped: HashMap<Uuid, Vec<model::MilestoneTemplate>> = HashMap::new();
        for step in steps {
            grouped.entry(step.project_template_id).or_default().push(step);
        }

        templates
            .into_iter()
            .map(|template| {
                let steps = grouped.remove(&template.id).unwrap_or_default();
                Self::from_model(template, steps)
            })
            .collect()
    }
}

/// List of project templates.
pub type ProjectTemplates = Vec<ProjectTemplate>;
