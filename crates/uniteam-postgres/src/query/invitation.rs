//! Invitation repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, ProjectRepository};
use crate::model::{Invitation, NewInvitation, UpdateInvitation};
use crate::types::{AccessScope, InvitationStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Invitation persistence.
pub trait InvitationRepository {
    /// Inserts a pending invitation.
    ///
    /// A second invitation for the same project and receiver fails with
    /// `invitations_project_receiver_unique`.
    fn create_invitation(
        &mut self,
        new_invitation: NewInvitation,
    ) -> impl Future<Output = PgResult<Invitation>> + Send;

    fn find_invitation_by_id(
        &mut self,
        invitation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Same as [`find_invitation_by_id`], holding a row lock until the
    /// transaction ends.
    ///
    /// [`find_invitation_by_id`]: InvitationRepository::find_invitation_by_id
    fn find_invitation_for_update(
        &mut self,
        invitation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    fn find_project_invitation(
        &mut self,
        project_id: Uuid,
        receiver_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Lists invitations visible in `scope`, newest first.
    ///
    /// Students additionally see every invitation addressed to them.
    fn list_scoped_invitations(
        &mut self,
        scope: AccessScope,
        status: Option<InvitationStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Invitation>>> + Send;

    fn update_invitation(
        &mut self,
        invitation_id: Uuid,
        updates: UpdateInvitation,
    ) -> impl Future<Output = PgResult<Invitation>> + Send;

    fn delete_invitation(
        &mut self,
        invitation_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl InvitationRepository for PgConnection {
    async fn create_invitation(&mut self, new_invitation: NewInvitation) -> PgResult<Invitation> {
        use schema::invitations;

        diesel::insert_into(invitations::table)
            .values(&new_invitation)
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_invitation_by_id(&mut self, invitation_id: Uuid) -> PgResult<Option<Invitation>> {
        use schema::invitations::{self, dsl};

        invitations::table
            .filter(dsl::id.eq(invitation_id))
            .select(Invitation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_invitation_for_update(
        &mut self,
        invitation_id: Uuid,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::{self, dsl};

        invitations::table
            .filter(dsl::id.eq(invitation_id))
            .select(Invitation::as_select())
            .for_update()
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_project_invitation(
        &mut self,
        project_id: Uuid,
        receiver_id: Uuid,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::{self, dsl};

        invitations::table
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::receiver_id.eq(receiver_id))
            .select(Invitation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_scoped_invitations(
        &mut self,
        scope: AccessScope,
        status: Option<InvitationStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<Invitation>> {
        use schema::invitations::{self, dsl};

        let visible = self.visible_project_ids(scope).await?;

        let mut query = invitations::table
            .select(Invitation::as_select())
            .into_boxed();
        query = match (scope, visible) {
            (_, None) => query,
            (AccessScope::Member(account_id), Some(project_ids)) => query.filter(
                dsl::receiver_id
                    .eq(account_id)
                    .or(dsl::project_id.eq_any(project_ids)),
            ),
            (_, Some(project_ids)) if project_ids.is_empty() => return Ok(Vec::new()),
            (_, Some(project_ids)) => query.filter(dsl::project_id.eq_any(project_ids)),
        };
        if let Some(status) = status {
            query = query.filter(dsl::status.eq(status));
        }

        query
            .order(dsl::sent_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_invitation(
        &mut self,
        invitation_id: Uuid,
        updates: UpdateInvitation,
    ) -> PgResult<Invitation> {
        use schema::invitations::{self, dsl};

        diesel::update(invitations::table.filter(dsl::id.eq(invitation_id)))
            .set(&updates)
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_invitation(&mut self, invitation_id: Uuid) -> PgResult<bool> {
        use schema::invitations::{self, dsl};

        let deleted = diesel::delete(invitations::table.filter(dsl::id.eq(invitation_id)))
            .execute(self)
            .await?;
        Ok(deleted > 0)
    }
}
