//! Milestone and assignee repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, ProjectRepository};
use crate::model::{Milestone, MilestoneAssignee, NewMilestone, NewMilestoneAssignee, UpdateMilestone};
use crate::types::AccessScope;
use crate::{PgConnection, PgError, PgResult, schema};

/// Milestone persistence.
///
/// Assignee sets are replaced wholesale; callers check them against the
/// team roster inside the same transaction.
pub trait MilestoneRepository {
    fn create_milestone(
        &mut self,
        new_milestone: NewMilestone,
    ) -> impl Future<Output = PgResult<Milestone>> + Send;

    /// Inserts several milestones at once, preserving input order.
    fn create_milestones(
        &mut self,
        new_milestones: Vec<NewMilestone>,
    ) -> impl Future<Output = PgResult<Vec<Milestone>>> + Send;

    fn find_milestone_by_id(
        &mut self,
        milestone_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Milestone>>> + Send;

    /// Lists a project's milestones by due date.
    fn list_project_milestones(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Milestone>>> + Send;

    /// Lists milestones under the projects visible in `scope`.
    fn list_scoped_milestones(
        &mut self,
        scope: AccessScope,
        project_id: Option<Uuid>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Milestone>>> + Send;

    fn update_milestone(
        &mut self,
        milestone_id: Uuid,
        updates: UpdateMilestone,
    ) -> impl Future<Output = PgResult<Milestone>> + Send;

    /// Deletes a milestone with its assignee links.
    fn delete_milestone(&mut self, milestone_id: Uuid)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Replaces the assignee set of a milestone.
    fn set_milestone_assignees(
        &mut self,
        milestone_id: Uuid,
        account_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<MilestoneAssignee>>> + Send;

    /// Loads assignee links for several milestones.
    fn list_milestone_assignees(
        &mut self,
        milestone_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<MilestoneAssignee>>> + Send;

    fn is_milestone_assignee(
        &mut self,
        milestone_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Drops an account from every assignee set within a project.
    fn remove_assignee_from_project(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl MilestoneRepository for PgConnection {
    async fn create_milestone(&mut self, new_milestone: NewMilestone) -> PgResult<Milestone> {
        use schema::milestones;

        diesel::insert_into(milestones::table)
            .values(&new_milestone)
            .returning(Milestone::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn create_milestones(
        &mut self,
        new_milestones: Vec<NewMilestone>,
    ) -> PgResult<Vec<Milestone>> {
        use schema::milestones;

        if new_milestones.is_empty() {
            return Ok(Vec::new());
        }

        diesel::insert_into(milestones::table)
            .values(&new_milestones)
            .returning(Milestone::as_returning())
            .get_results(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_milestone_by_id(&mut self, milestone_id: Uuid) -> PgResult<Option<Milestone>> {
        use schema::milestones::{self, dsl};

        milestones::table
            .filter(dsl::id.eq(milestone_id))
            .select(Milestone::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_project_milestones(&mut self, project_id: Uuid) -> PgResult<Vec<Milestone>> {
        use schema::milestones::{self, dsl};

        milestones::table
            .filter(dsl::project_id.eq(project_id))
            .select(Milestone::as_select())
            .order((dsl::due_date.asc(), dsl::created_at.asc()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_scoped_milestones(
        &mut self,
        scope: AccessScope,
        project_id: Option<Uuid>,
        pagination: Pagination,
    ) -> PgResult<Vec<Milestone>> {
        use schema::milestones::{self, dsl};

        let visible = self.visible_project_ids(scope).await?;

        let mut query = milestones::table.select(Milestone::as_select()).into_boxed();
        if let Some(project_ids) = visible {
            if project_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(dsl::project_id.eq_any(project_ids));
        }
        if let Some(project_id) = project_id {
            query = query.filter(dsl::project_id.eq(project_id));
        }

        query
            .order((dsl::due_date.asc(), dsl::created_at.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_milestone(
        &mut self,
        milestone_id: Uuid,
        updates: UpdateMilestone,
    ) -> PgResult<Milestone> {
        use schema::milestones::{self, dsl};

        diesel::update(milestones::table.filter(dsl::id.eq(milestone_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(Milestone::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_milestone(&mut self, milestone_id: Uuid) -> PgResult<bool> {
        use schema::{milestone_assignees, milestones};

        diesel::delete(
            milestone_assignees::table.filter(milestone_assignees::milestone_id.eq(milestone_id)),
        )
        .execute(self)
        .await?;

        let deleted = diesel::delete(milestones::table.filter(milestones::id.eq(milestone_id)))
            .execute(self)
            .await?;
        Ok(deleted > 0)
    }

    async fn set_milestone_assignees(
        &mut self,
        milestone_id: Uuid,
        account_ids: &[Uuid],
    ) -> PgResult<Vec<MilestoneAssignee>> {
        use schema::milestone_assignees::{self, dsl};

        diesel::delete(milestone_assignees::table.filter(dsl::milestone_id.eq(milestone_id)))
            .execute(self)
            .await?;

        let mut account_ids = account_ids.to_vec();
        account_ids.sort_unstable();
        account_ids.dedup();
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = account_ids
            .into_iter()
            .map(|account_id| NewMilestoneAssignee {
                milestone_id,
                account_id,
            })
            .collect::<Vec<_>>();

        diesel::insert_into(milestone_assignees::table)
            .values(&rows)
            .returning(MilestoneAssignee::as_returning())
            .get_results(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_milestone_assignees(
        &mut self,
        milestone_ids: &[Uuid],
    ) -> PgResult<Vec<MilestoneAssignee>> {
        use schema::milestone_assignees::{self, dsl};

        if milestone_ids.is_empty() {
            return Ok(Vec::new());
        }

        milestone_assignees::table
            .filter(dsl::milestone_id.eq_any(milestone_ids))
            .select(MilestoneAssignee::as_select())
            .order(dsl::assigned_at.asc())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn is_milestone_assignee(
        &mut self,
        milestone_id: Uuid,
        account_id: Uuid,
    ) -> PgResult<bool> {
        use schema::milestone_assignees::{self, dsl};

        let found: Option<Uuid> = milestone_assignees::table
            .filter(dsl::milestone_id.eq(milestone_id))
            .filter(dsl::account_id.eq(account_id))
            .select(dsl::account_id)
            .first(self)
            .await
            .optional()?;
        Ok(found.is_some())
    }

    async fn remove_assignee_from_project(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> PgResult<usize> {
        use schema::{milestone_assignees, milestones};

        let project_milestones = milestones::table
            .filter(milestones::project_id.eq(project_id))
            .select(milestones::id);

        diesel::delete(
            milestone_assignees::table
                .filter(milestone_assignees::account_id.eq(account_id))
                .filter(milestone_assignees::milestone_id.eq_any(project_milestones)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)
    }
}
