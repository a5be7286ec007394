//! Project and team response types.

use jiff::Timestamp;
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model;
use uuid::Uuid;

use super::{AccountSummary, Milestone, TeamMember};

/// Represents a project without its aggregate.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier of the project.
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub deadline: Date,
    /// Supervising lecturer, if any.
    pub supervisor_id: Option<Uuid>,
    /// Template the milestones were seeded from, if any.
    pub template_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn from_model(project: model::Project) -> Self {
        Self {
            project_id: project.id,
            deadline: project.deadline(),
            title: project.title,
            description: project.description,
            course_code: project.course_code,
            supervisor_id: project.supervisor_id,
            template_id: project.template_id,
            created_by: project.created_by,
            created_at: project.created_at.into(),
            updated_at: project.updated_at.into(),
        }
    }
}

/// List of projects.
pub type Projects = Vec<Project>;

/// Represents a project team with its roster.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: Uuid,
    pub project_id: Uuid,
    /// Memberships, leaders first.
    pub members: Vec<TeamMember>,
    pub created_at: Timestamp,
}

impl Team {
    pub fn from_model(team: model::Team, members: Vec<TeamMember>) -> Self {
        Self {
            team_id: team.id,
            project_id: team.project_id,
            members,
            created_at: team.created_at.into(),
        }
    }
}

/// A project with its supervisor, team and milestones embedded.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub supervisor: Option<AccountSummary>,
    pub team: Team,
    pub milestones: Vec<Milestone>,
}
