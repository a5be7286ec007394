//! Project and milestone template models.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use super::NewMilestone;
use crate::schema::{milestone_templates, project_templates};
use crate::types::MilestoneStatus;

/// A reusable project blueprint authored by a lecturer.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = project_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectTemplate {
    pub id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub course_code: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProjectTemplate {
    pub created_by: Uuid,
    pub title: String,
    pub course_code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = project_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProjectTemplate {
    pub title: Option<String>,
    pub course_code: Option<String>,
    pub description: Option<String>,
}

impl ProjectTemplate {
    #[inline]
    pub fn is_created_by(&self, account_id: Uuid) -> bool {
        self.created_by == account_id
    }
}

/// One step of a [`ProjectTemplate`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = milestone_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MilestoneTemplate {
    pub id: Uuid,
    pub project_template_id: Uuid,
    pub title: String,
    pub description: String,
    /// Ascending position; ties keep creation order.
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = milestone_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMilestoneTemplate {
    pub project_template_id: Uuid,
    pub title: String,
    pub description: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = milestone_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateMilestoneTemplate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

impl MilestoneTemplate {
    /// Builds the milestone this step seeds into `project_id`.
    ///
    /// Every seeded milestone is due on the project deadline.
    pub fn instantiate(&self, project_id: Uuid, deadline: jiff::civil::Date) -> NewMilestone {
        NewMilestone {
            project_id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: deadline.into(),
            status: MilestoneStatus::Pending,
        }
    }
}

/// Seeds one milestone per template step, ordered by `display_order` and
/// then by creation time.
pub fn instantiate_milestones(
    templates: &[MilestoneTemplate],
    project_id: Uuid,
    deadline: jiff::civil::Date,
) -> Vec<NewMilestone> {
    let mut ordered = templates.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|template| {
        (
            template.display_order,
            jiff::Timestamp::from(template.created_at),
        )
    });

    ordered
        .into_iter()
        .map(|template| template.instantiate(project_id, deadline))
        .collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn step(title: &str, display_order: i32, created_secs: i64) -> MilestoneTemplate {
        let created_at = jiff::Timestamp::from_second(created_secs)
            .map(Timestamp::from)
            .unwrap_or_else(|_| Timestamp::from(jiff::Timestamp::UNIX_EPOCH));

        MilestoneTemplate {
            id: Uuid::new_v4(),
            project_template_id: Uuid::nil(),
            title: title.into(),
            description: format!("{title} description"),
            display_order,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn clones_every_step_in_order_due_on_deadline() {
        let project_id = Uuid::new_v4();
        let deadline = date(2025, 6, 30);
        let templates = vec![
            step("Report", 2, 10),
            step("Proposal", 0, 30),
            step("Prototype", 1, 20),
            step("Demo", 1, 40),
        ];

        let milestones = instantiate_milestones(&templates, project_id, deadline);

        assert_eq!(milestones.len(), templates.len());
        let titles = milestones.iter().map(|m| m.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["Proposal", "Prototype", "Demo", "Report"]);
        assert!(milestones.iter().all(|m| {
            m.project_id == project_id
                && jiff::civil::Date::from(m.due_date) == deadline
                && m.status == MilestoneStatus::Pending
        }));
        assert_eq!(milestones[0].description, "Proposal description");
    }

    #[test]
    fn empty_template_seeds_nothing() {
        assert!(instantiate_milestones(&[], Uuid::new_v4(), date(2025, 1, 1)).is_empty());
    }
}
