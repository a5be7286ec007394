//! Milestone response types.

use std::collections::HashMap;

use jiff::Timestamp;
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{self, MilestoneAssignee};
use uniteam_postgres::types::MilestoneStatus;
use uuid::Uuid;

/// Represents a milestone.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique identifier of the milestone.
    pub milestone_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Date,
    pub status: MilestoneStatus,
    /// Accounts responsible for the milestone, all of them team members.
    pub assigned_to: Vec<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Milestone {
    pub fn from_model(milestone: model::Milestone, assigned_to: Vec<Uuid>) -> Self {
        Self {
            milestone_id: milestone.id,
            project_id: milestone.project_id,
            due_date: milestone.due_date(),
            title: milestone.title,
            description: milestone.description,
            status: milestone.status,
            assigned_to,
            created_at: milestone.created_at.into(),
            updated_at: milestone.updated_at.into(),
        }
    }

    /// Groups `assignees` under their milestones.
    pub fn from_models(
        milestones: Vec<model::Milestone>,
        assignees: Vec<MilestoneAssignee>,
    ) -> Vec<Self> {
        let mut assigned: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for assignee in assignees {
            assigned
                .entry(assignee.milestone_id)
                .or_default()
                .push(assignee.account_id);
        }

        milestones
            .into_iter()
            .map(|milestone| {
                let assigned_to = assigned.remove(&milestone.id).unwrap_or_default();
                Self::from_model(milestone, assigned_to)
            })
            .collect()
    }
}

/// List of milestones.
pub type Milestones = Vec<Milestone>;

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(project_id: Uuid, title: &str) -> model::Milestone {
        let now = jiff::Timestamp::UNIX_EPOCH;
        model::Milestone {
            id: Uuid::new_v4(),
            project_id,
            title: title.to_owned(),
            description: String::new(),
            due_date: jiff::civil::date(2026, 6, 30).into(),
            status: MilestoneStatus::default(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn assignee(milestone_id: Uuid, account_id: Uuid) -> MilestoneAssignee {
        MilestoneAssignee {
            milestone_id,
            account_id,
            assigned_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn groups_assignees_per_milestone() {
        let project_id = Uuid::new_v4();
        let (ada, alan) = (Uuid::new_v4(), Uuid::new_v4());
        let design = milestone(project_id, "Design");
        let report = milestone(project_id, "Report");
        let assignees = vec![
            assignee(design.id, ada),
            assignee(report.id, alan),
            assignee(design.id, alan),
        ];

        let milestones = Milestone::from_models(vec![design, report], assignees);

        assert_eq!(milestones[0].title, "Design");
        assert_eq!(milestones[0].assigned_to, vec![ada, alan]);
        assert_eq!(milestones[1].assigned_to, vec![alan]);
        assert_eq!(milestones[0].due_date, jiff::civil::date(2026, 6, 30));
    }
}
