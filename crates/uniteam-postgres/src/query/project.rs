//! Project and team repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewProject, NewTeam, Project, Team, UpdateProject};
use crate::types::AccessScope;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Project and team persistence.
///
/// Multi-step writes such as creating a project with its team and leader are
/// composed by callers inside [`PgConn::transaction`].
///
/// [`PgConn::transaction`]: crate::PgConn::transaction
pub trait ProjectRepository {
    fn create_project(
        &mut self,
        new_project: NewProject,
    ) -> impl Future<Output = PgResult<Project>> + Send;

    fn find_project_by_id(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Project>>> + Send;

    /// Returns the ids of the projects visible in `scope`.
    ///
    /// `None` means every project is visible. Supervisors also see the
    /// projects whose team they belong to.
    fn visible_project_ids(
        &mut self,
        scope: AccessScope,
    ) -> impl Future<Output = PgResult<Option<Vec<Uuid>>>> + Send;

    /// Lists visible projects, nearest deadline first.
    fn list_projects(
        &mut self,
        scope: AccessScope,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Project>>> + Send;

    fn update_project(
        &mut self,
        project_id: Uuid,
        updates: UpdateProject,
    ) -> impl Future<Output = PgResult<Project>> + Send;

    /// Deletes a project and everything under it, dependents first.
    ///
    /// Must run inside a transaction. Returns `false` if the project did not
    /// exist.
    fn delete_project_cascade(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    fn create_team(&mut self, new_team: NewTeam) -> impl Future<Output = PgResult<Team>> + Send;

    fn find_team_by_id(
        &mut self,
        team_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Team>>> + Send;

    fn find_team_by_project(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Team>>> + Send;

    /// Locks the team row until the surrounding transaction ends.
    ///
    /// Role-mutating operations take this lock before counting leaders.
    fn lock_team(&mut self, team_id: Uuid) -> impl Future<Output = PgResult<Team>> + Send;
}

impl ProjectRepository for PgConnection {
    async fn create_project(&mut self, new_project: NewProject) -> PgResult<Project> {
        use schema::projects;

        diesel::insert_into(projects::table)
            .values(&new_project)
            .returning(Project::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_project_by_id(&mut self, project_id: Uuid) -> PgResult<Option<Project>> {
        use schema::projects::{self, dsl};

        projects::table
            .filter(dsl::id.eq(project_id))
            .select(Project::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn visible_project_ids(&mut self, scope: AccessScope) -> PgResult<Option<Vec<Uuid>>> {
        use schema::{projects, team_members, teams};

        let account_id = match scope {
            AccessScope::Unrestricted => return Ok(None),
            AccessScope::Supervisor(id) | AccessScope::Member(id) => id,
        };

        let mut project_ids: Vec<Uuid> = team_members::table
            .inner_join(teams::table)
            .filter(team_members::account_id.eq(account_id))
            .select(teams::project_id)
            .load(self)
            .await?;

        if let AccessScope::Supervisor(_) = scope {
            let supervised: Vec<Uuid> = projects::table
                .filter(projects::supervisor_id.eq(account_id))
                .select(projects::id)
                .load(self)
                .await?;
            project_ids.extend(supervised);
            project_ids.sort_unstable();
            project_ids.dedup();
        }

        Ok(Some(project_ids))
    }

    async fn list_projects(
        &mut self,
        scope: AccessScope,
        pagination: Pagination,
    ) -> PgResult<Vec<Project>> {
        use schema::projects::{self, dsl};

        let visible = self.visible_project_ids(scope).await?;

        let mut query = projects::table.select(Project::as_select()).into_boxed();
        if let Some(project_ids) = visible {
            if project_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(dsl::id.eq_any(project_ids));
        }

        query
            .order((dsl::deadline.asc(), dsl::created_at.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_project(
        &mut self,
        project_id: Uuid,
        updates: UpdateProject,
    ) -> PgResult<Project> {
        use schema::projects::{self, dsl};

        diesel::update(projects::table.filter(dsl::id.eq(project_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(Project::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_project_cascade(&mut self, project_id: Uuid) -> PgResult<bool> {
        use schema::{invitations, milestone_assignees, milestones, projects, team_members, teams};

        let milestone_ids = milestones::table
            .filter(milestones::project_id.eq(project_id))
            .select(milestones::id);
        let assignees = diesel::delete(
            milestone_assignees::table
                .filter(milestone_assignees::milestone_id.eq_any(milestone_ids)),
        )
        .execute(self)
        .await?;

        let milestones =
            diesel::delete(milestones::table.filter(milestones::project_id.eq(project_id)))
                .execute(self)
                .await?;

        let invitations =
            diesel::delete(invitations::table.filter(invitations::project_id.eq(project_id)))
                .execute(self)
                .await?;

        let team_ids = teams::table
            .filter(teams::project_id.eq(project_id))
            .select(teams::id);
        let members =
            diesel::delete(team_members::table.filter(team_members::team_id.eq_any(team_ids)))
                .execute(self)
                .await?;

        diesel::delete(teams::table.filter(teams::project_id.eq(project_id)))
            .execute(self)
            .await?;

        let deleted = diesel::delete(projects::table.filter(projects::id.eq(project_id)))
            .execute(self)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            %project_id,
            assignees,
            milestones,
            invitations,
            members,
            "Deleted project dependents"
        );

        Ok(deleted > 0)
    }

    async fn create_team(&mut self, new_team: NewTeam) -> PgResult<Team> {
        use schema::teams;

        diesel::insert_into(teams::table)
            .values(&new_team)
            .returning(Team::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_team_by_id(&mut self, team_id: Uuid) -> PgResult<Option<Team>> {
        use schema::teams::{self, dsl};

        teams::table
            .filter(dsl::id.eq(team_id))
            .select(Team::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_team_by_project(&mut self, project_id: Uuid) -> PgResult<Option<Team>> {
        use schema::teams::{self, dsl};

        teams::table
            .filter(dsl::project_id.eq(project_id))
            .select(Team::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn lock_team(&mut self, team_id: Uuid) -> PgResult<Team> {
        use schema::teams::{self, dsl};

        teams::table
            .filter(dsl::id.eq(team_id))
            .select(Team::as_select())
            .for_update()
            .first(self)
            .await
            .map_err(PgError::from)
    }
}
