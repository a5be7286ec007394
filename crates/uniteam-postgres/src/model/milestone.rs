//! Milestone and assignee models.

use std::collections::HashSet;

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::{milestone_assignees, milestones};
use crate::types::MilestoneStatus;

/// A deliverable within a project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = milestones)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Milestone {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Date,
    pub status: MilestoneStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = milestones)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMilestone {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Date,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = milestones)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateMilestone {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub status: Option<MilestoneStatus>,
}

impl Milestone {
    #[inline]
    pub fn due_date(&self) -> jiff::civil::Date {
        self.due_date.into()
    }
}

/// Link between a milestone and an assigned team member.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = milestone_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MilestoneAssignee {
    pub milestone_id: Uuid,
    pub account_id: Uuid,
    pub assigned_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = milestone_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMilestoneAssignee {
    pub milestone_id: Uuid,
    pub account_id: Uuid,
}

/// Returns the requested assignees that are not members of the team, in
/// request order and without duplicates.
///
/// An empty result means the assignee set is valid.
pub fn unassignable_accounts(requested: &[Uuid], team_members: &[Uuid]) -> Vec<Uuid> {
    let members = team_members.iter().collect::<HashSet<_>>();
    let mut seen = HashSet::new();

    requested
        .iter()
        .filter(|id| !members.contains(id) && seen.insert(**id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_assignable() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(unassignable_accounts(&[a, b], &[b, a]).is_empty());
        assert!(unassignable_accounts(&[], &[a]).is_empty());
    }

    #[test]
    fn outsiders_are_reported_once() {
        let (member, outsider) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            unassignable_accounts(&[outsider, member, outsider], &[member]),
            vec![outsider]
        );
    }
}
