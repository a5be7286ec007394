//! Team membership repository.

use std::future::Future;

use diesel::dsl::{count_star, now};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, ProjectRepository};
use crate::model::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::types::{AccessScope, TeamRole};
use crate::{PgConnection, PgError, PgResult, schema};

/// Membership persistence and leader bookkeeping.
pub trait TeamMemberRepository {
    fn add_team_member(
        &mut self,
        new_member: NewTeamMember,
    ) -> impl Future<Output = PgResult<TeamMember>> + Send;

    /// Returns the existing membership of the account, or inserts
    /// `new_member` when there is none. The role of an existing membership
    /// is left untouched.
    fn get_or_create_team_member(
        &mut self,
        new_member: NewTeamMember,
    ) -> impl Future<Output = PgResult<TeamMember>> + Send;

    fn find_team_member_by_id(
        &mut self,
        membership_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<TeamMember>>> + Send;

    fn find_team_member(
        &mut self,
        team_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<TeamMember>>> + Send;

    /// Finds the membership of an account in the team of a project.
    fn find_membership_in_project(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<TeamMember>>> + Send;

    /// Lists a team's roster, leaders first.
    fn list_team_members(
        &mut self,
        team_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<TeamMember>>> + Send;

    /// Lists memberships under the projects visible in `scope`.
    fn list_scoped_team_members(
        &mut self,
        scope: AccessScope,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<TeamMember>>> + Send;

    /// Returns the account ids on a project's team.
    fn list_project_member_ids(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Uuid>>> + Send;

    /// Counts leaders. Read it under [`lock_team`] when the result guards a
    /// write.
    ///
    /// [`lock_team`]: super::ProjectRepository::lock_team
    fn count_team_leaders(&mut self, team_id: Uuid) -> impl Future<Output = PgResult<i64>> + Send;

    fn update_team_member(
        &mut self,
        membership_id: Uuid,
        updates: UpdateTeamMember,
    ) -> impl Future<Output = PgResult<TeamMember>> + Send;

    fn delete_team_member(
        &mut self,
        membership_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Locks every team the account leads and returns those in which it is
    /// the only leader. Run it inside the transaction that removes the
    /// account.
    fn list_sole_leader_teams(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Uuid>>> + Send;
}

impl TeamMemberRepository for PgConnection {
    async fn add_team_member(&mut self, new_member: NewTeamMember) -> PgResult<TeamMember> {
        use schema::team_members;

        diesel::insert_into(team_members::table)
            .values(&new_member)
            .returning(TeamMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn get_or_create_team_member(
        &mut self,
        new_member: NewTeamMember,
    ) -> PgResult<TeamMember> {
        use schema::team_members::{self, dsl};

        diesel::insert_into(team_members::table)
            .values(&new_member)
            .on_conflict((dsl::team_id, dsl::account_id))
            .do_nothing()
            .execute(self)
            .await?;

        team_members::table
            .filter(dsl::team_id.eq(new_member.team_id))
            .filter(dsl::account_id.eq(new_member.account_id))
            .select(TeamMember::as_select())
            .first(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_team_member_by_id(&mut self, membership_id: Uuid) -> PgResult<Option<TeamMember>> {
        use schema::team_members::{self, dsl};

        team_members::table
            .filter(dsl::id.eq(membership_id))
            .select(TeamMember::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_team_member(
        &mut self,
        team_id: Uuid,
        account_id: Uuid,
    ) -> PgResult<Option<TeamMember>> {
        use schema::team_members::{self, dsl};

        team_members::table
            .filter(dsl::team_id.eq(team_id))
            .filter(dsl::account_id.eq(account_id))
            .select(TeamMember::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_membership_in_project(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> PgResult<Option<TeamMember>> {
        use schema::{team_members, teams};

        team_members::table
            .inner_join(teams::table)
            .filter(teams::project_id.eq(project_id))
            .filter(team_members::account_id.eq(account_id))
            .select(TeamMember::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_team_members(&mut self, team_id: Uuid) -> PgResult<Vec<TeamMember>> {
        use schema::team_members::{self, dsl};

        let mut members: Vec<TeamMember> = team_members::table
            .filter(dsl::team_id.eq(team_id))
            .select(TeamMember::as_select())
            .order(dsl::joined_at.asc())
            .load(self)
            .await?;

        // Stable, so join order is kept within a role.
        members.sort_by_key(|member| std::cmp::Reverse(member.member_role));
        Ok(members)
    }

    async fn list_scoped_team_members(
        &mut self,
        scope: AccessScope,
        pagination: Pagination,
    ) -> PgResult<Vec<TeamMember>> {
        use schema::{team_members, teams};

        let visible = self.visible_project_ids(scope).await?;

        let mut query = team_members::table
            .inner_join(teams::table)
            .select(TeamMember::as_select())
            .into_boxed();
        if let Some(project_ids) = visible {
            if project_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(teams::project_id.eq_any(project_ids));
        }

        query
            .order((team_members::team_id.asc(), team_members::joined_at.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_project_member_ids(&mut self, project_id: Uuid) -> PgResult<Vec<Uuid>> {
        use schema::{team_members, teams};

        team_members::table
            .inner_join(teams::table)
            .filter(teams::project_id.eq(project_id))
            .select(team_members::account_id)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_team_leaders(&mut self, team_id: Uuid) -> PgResult<i64> {
        use schema::team_members::{self, dsl};

        team_members::table
            .filter(dsl::team_id.eq(team_id))
            .filter(dsl::member_role.eq(TeamRole::Leader))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_team_member(
        &mut self,
        membership_id: Uuid,
        updates: UpdateTeamMember,
    ) -> PgResult<TeamMember> {
        use schema::team_members::{self, dsl};

        diesel::update(team_members::table.filter(dsl::id.eq(membership_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(TeamMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_team_member(&mut self, membership_id: Uuid) -> PgResult<bool> {
        use schema::team_members::{self, dsl};

        let deleted = diesel::delete(team_members::table.filter(dsl::id.eq(membership_id)))
            .execute(self)
            .await?;
        Ok(deleted > 0)
    }

    async fn list_sole_leader_teams(&mut self, account_id: Uuid) -> PgResult<Vec<Uuid>> {
        use schema::team_members::{self, dsl};

        let led_teams: Vec<Uuid> = team_members::table
            .filter(dsl::account_id.eq(account_id))
            .filter(dsl::member_role.eq(TeamRole::Leader))
            .select(dsl::team_id)
            .load(self)
            .await?;
        if led_teams.is_empty() {
            return Ok(Vec::new());
        }

        // Id order keeps concurrent lockers from deadlocking.
        schema::teams::table
            .filter(schema::teams::id.eq_any(&led_teams))
            .order(schema::teams::id.asc())
            .select(schema::teams::id)
            .for_update()
            .load::<Uuid>(self)
            .await?;

        let leader_counts: Vec<(Uuid, i64)> = team_members::table
            .filter(dsl::team_id.eq_any(&led_teams))
            .filter(dsl::member_role.eq(TeamRole::Leader))
            .group_by(dsl::team_id)
            .select((dsl::team_id, count_star()))
            .load(self)
            .await?;

        Ok(leader_counts
            .into_iter()
            .filter(|(_, leaders)| *leaders <= 1)
            .map(|(team_id, _)| team_id)
            .collect())
    }
}
