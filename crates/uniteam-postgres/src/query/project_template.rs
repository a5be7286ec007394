//! Project and milestone template repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, contains_pattern};
use crate::model::{
    MilestoneTemplate, NewMilestoneTemplate, NewProjectTemplate, ProjectTemplate,
    UpdateMilestoneTemplate, UpdateProjectTemplate,
};
use crate::{PgConnection, PgError, PgResult, schema};

/// Template catalog persistence. Templates are visible to every account.
pub trait ProjectTemplateRepository {
    fn create_project_template(
        &mut self,
        new_template: NewProjectTemplate,
    ) -> impl Future<Output = PgResult<ProjectTemplate>> + Send;

    fn find_project_template_by_id(
        &mut self,
        template_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ProjectTemplate>>> + Send;

    /// Lists templates by title, optionally filtered by course code.
    fn list_project_templates(
        &mut self,
        course_code: Option<&str>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ProjectTemplate>>> + Send;

    fn update_project_template(
        &mut self,
        template_id: Uuid,
        updates: UpdateProjectTemplate,
    ) -> impl Future<Output = PgResult<ProjectTemplate>> + Send;

    /// Deletes a template; its milestone templates cascade and seeded
    /// projects keep their milestones.
    fn delete_project_template(
        &mut self,
        template_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    fn create_milestone_templates(
        &mut self,
        new_templates: Vec<NewMilestoneTemplate>,
    ) -> impl Future<Output = PgResult<Vec<MilestoneTemplate>>> + Send;

    fn find_milestone_template_by_id(
        &mut self,
        milestone_template_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<MilestoneTemplate>>> + Send;

    /// Lists milestone templates in display order, optionally for one
    /// project template.
    fn list_milestone_templates(
        &mut self,
        project_template_id: Option<Uuid>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<MilestoneTemplate>>> + Send;

    /// Loads every step of the given templates in display order.
    fn list_template_steps(
        &mut self,
        project_template_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<MilestoneTemplate>>> + Send;

    fn update_milestone_template(
        &mut self,
        milestone_template_id: Uuid,
        updates: UpdateMilestoneTemplate,
    ) -> impl Future<Output = PgResult<MilestoneTemplate>> + Send;

    fn delete_milestone_template(
        &mut self,
        milestone_template_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl ProjectTemplateRepository for PgConnection {
    async fn create_project_template(
        &mut self,
        new_template: NewProjectTemplate,
    ) -> PgResult<ProjectTemplate> {
        use schema::project_templates;

        diesel::insert_into(project_templates::table)
            .values(&new_template)
            .returning(ProjectTemplate::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_project_template_by_id(
        &mut self,
        template_id: Uuid,
    ) -> PgResult<Option<ProjectTemplate>> {
        use schema::project_templates::{self, dsl};

        project_templates::table
            .filter(dsl::id.eq(template_id))
            .select(ProjectTemplate::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_project_templates(
        &mut self,
        course_code: Option<&str>,
        pagination: Pagination,
    ) -> PgResult<Vec<ProjectTemplate>> {
        use schema::project_templates::{self, dsl};

        let mut query = project_templates::table
            .select(ProjectTemplate::as_select())
            .into_boxed();
        if let Some(course_code) = course_code.filter(|c| !c.trim().is_empty()) {
            query = query.filter(dsl::course_code.ilike(contains_pattern(course_code)));
        }

        query
            .order((dsl::title.asc(), dsl::created_at.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_project_template(
        &mut self,
        template_id: Uuid,
        updates: UpdateProjectTemplate,
    ) -> PgResult<ProjectTemplate> {
        use schema::project_templates::{self, dsl};

        diesel::update(project_templates::table.filter(dsl::id.eq(template_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(ProjectTemplate::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_project_template(&mut self, template_id: Uuid) -> PgResult<bool> {
        use schema::project_templates::{self, dsl};

        let deleted = diesel::delete(project_templates::table.filter(dsl::id.eq(template_id)))
            .execute(self)
            .await?;
        Ok(deleted > 0)
    }

    async fn create_milestone_templates(
        &mut self,
        new_templates: Vec<NewMilestoneTemplate>,
    ) -> PgResult<Vec<MilestoneTemplate>> {
        use schema::milestone_templates;

        if new_templates.is_empty() {
            return Ok(Vec::new());
        }

        diesel::insert_into(milestone_templates::table)
            .values(&new_templates)
            .returning(MilestoneTemplate::as_returning())
            .get_results(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_milestone_template_by_id(
        &mut self,
        milestone_template_id: Uuid,
    ) -> PgResult<Option<MilestoneTemplate>> {
        use schema::milestone_templates::{self, dsl};

        milestone_templates::table
            .filter(dsl::id.eq(milestone_template_id))
            .select(MilestoneTemplate::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_milestone_templates(
        &mut self,
        project_template_id: Option<Uuid>,
        pagination: Pagination,
    ) -> PgResult<Vec<MilestoneTemplate>> {
        use schema::milestone_templates::{self, dsl};

        let mut query = milestone_templates::table
            .select(MilestoneTemplate::as_select())
            .into_boxed();
        if let Some(project_template_id) = project_template_id {
            query = query.filter(dsl::project_template_id.eq(project_template_id));
        }

        query
            .order((
                dsl::project_template_id.asc(),
                dsl::display_order.asc(),
                dsl::created_at.asc(),
            ))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_template_steps(
        &mut self,
        project_template_ids: &[Uuid],
    ) -> PgResult<Vec<MilestoneTemplate>> {
        use schema::milestone_templates::{self, dsl};

        if project_template_ids.is_empty() {
            return Ok(Vec::new());
        }

        milestone_templates::table
            .filter(dsl::project_template_id.eq_any(project_template_ids))
            .select(MilestoneTemplate::as_select())
            .order((dsl::display_order.asc(), dsl::created_at.asc()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_milestone_template(
        &mut self,
        milestone_template_id: Uuid,
        updates: UpdateMilestoneTemplate,
    ) -> PgResult<MilestoneTemplate> {
        use schema::milestone_templates::{self, dsl};

        diesel::update(milestone_templates::table.filter(dsl::id.eq(milestone_template_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(MilestoneTemplate::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_milestone_template(&mut self, milestone_template_id: Uuid) -> PgResult<bool> {
        use schema::milestone_templates::{self, dsl};

        let deleted =
            diesel::delete(milestone_templates::table.filter(dsl::id.eq(milestone_template_id)))
                .execute(self)
                .await?;
        Ok(deleted > 0)
    }
}
