//! Project and team models.

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::{projects, teams};

/// An academic project. Owns exactly one [`Team`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub course_code: String,
    /// Default due date of milestones seeded from a template.
    pub deadline: Date,
    /// Supervising lecturer.
    pub supervisor_id: Option<Uuid>,
    /// Template the project was seeded from.
    pub template_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub deadline: Date,
    pub supervisor_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub deadline: Option<Date>,
    pub supervisor_id: Option<Option<Uuid>>,
}

impl Project {
    /// Returns whether `account_id` supervises this project.
    #[inline]
    pub fn is_supervised_by(&self, account_id: Uuid) -> bool {
        self.supervisor_id == Some(account_id)
    }

    #[inline]
    pub fn deadline(&self) -> jiff::civil::Date {
        self.deadline.into()
    }
}

impl NewProject {
    pub fn new(title: impl Into<String>, deadline: jiff::civil::Date) -> Self {
        Self {
            title: title.into().trim().to_owned(),
            description: String::new(),
            course_code: String::new(),
            deadline: deadline.into(),
            supervisor_id: None,
            template_id: None,
            created_by: None,
        }
    }
}

/// The roster container of a project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Team {
    pub id: Uuid,
    pub project_id: Uuid,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTeam {
    pub project_id: Uuid,
}
