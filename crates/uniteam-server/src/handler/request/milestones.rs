//! Milestone request types.

use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{NewMilestone, UpdateMilestone as UpdateMilestoneModel};
use uniteam_postgres::types::MilestoneStatus;
use uuid::Uuid;
use validator::Validate;

use super::validations::Normalized;

/// Request payload for creating a milestone.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestone {
    pub project_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    pub due_date: Date,

    #[serde(default)]
    pub status: MilestoneStatus,

    /// Team members responsible for the milestone.
    #[validate(length(max = 100))]
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
}

impl CreateMilestone {
    pub fn into_model(self) -> (NewMilestone, Vec<Uuid>) {
        let new_milestone = NewMilestone {
            project_id: self.project_id,
            title: self.title.normalized(),
            description: self.description.normalized(),
            due_date: self.due_date.into(),
            status: self.status,
        };
        (new_milestone, dedup(self.assigned_to))
    }
}

/// Request payload for updating a milestone. Absent fields are unchanged;
/// `assignedTo` replaces the whole assignee set.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestone {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub due_date: Option<Date>,

    pub status: Option<MilestoneStatus>,

    #[validate(length(max = 100))]
    pub assigned_to: Option<Vec<Uuid>>,
}

impl UpdateMilestone {
    pub fn into_model(self) -> (UpdateMilestoneModel, Option<Vec<Uuid>>) {
        let updates = UpdateMilestoneModel {
            title: self.title.normalized(),
            description: self.description.normalized(),
            due_date: self.due_date.map(Into::into),
            status: self.status,
        };
        (updates, self.assigned_to.map(dedup))
    }
}

/// Request payload for the assignee-only status update.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneStatus {
    pub status: MilestoneStatus,
}

/// Optional project filter for the milestone list.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneFilter {
    pub project_id: Option<Uuid>,
}

fn dedup(mut account_ids: Vec<Uuid>) -> Vec<Uuid> {
    account_ids.sort_unstable();
    account_ids.dedup();
    account_ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignees_are_deduplicated() -> anyhow::Result<()> {
        let member = Uuid::new_v4();
        let request = CreateMilestone {
            project_id: Uuid::new_v4(),
            title: "Proposal".to_owned(),
            description: String::new(),
            due_date: jiff::civil::date(2026, 3, 1),
            status: MilestoneStatus::default(),
            assigned_to: vec![member, member],
        };

        let (milestone, assignees) = request.into_model();
        assert_eq!(assignees, vec![member]);
        assert_eq!(milestone.status, MilestoneStatus::Pending);
        Ok(())
    }

    #[test]
    fn absent_assignees_are_left_alone() -> anyhow::Result<()> {
        let request: UpdateMilestone = serde_json::from_str(r#"{"status":"COMPLETED"}"#)?;
        let (updates, assignees) = request.into_model();
        assert_eq!(updates.status, Some(MilestoneStatus::Completed));
        assert!(assignees.is_none());
        Ok(())
    }
}
