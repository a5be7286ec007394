//! Team invitation handlers.
//!
//! Leaders and co-leaders invite students; the receiver accepts or declines
//! once. Accepting locks the invitation row and adds the receiver to the team
//! as a member in the same transaction.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::{PgConn, PgConnection};
use uniteam_postgres::model::{Invitation as InvitationModel, NewTeamMember};
use uniteam_postgres::query::{InvitationRepository, ProjectRepository, TeamMemberRepository};
use uniteam_postgres::types::{InvitationStatus, TeamRole};
use uuid::Uuid;

use crate::extract::{
    AuthContext, AuthProvider, AuthState, Json, Path, PgPool, Permission, Query, ValidateJson,
};
use crate::handler::accounts::find_account;
use crate::handler::request::{CreateInvitation, InvitationFilter, InvitationPathParams, Pagination};
use crate::handler::response::{ErrorResponse, Invitation, Invitations};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for invitation operations.
const TRACING_TARGET: &str = "uniteam_server::handler::invitations";

async fn find_invitation(conn: &mut PgConnection, invitation_id: Uuid) -> Result<InvitationModel> {
    conn.find_invitation_by_id(invitation_id)
        .await?
        .ok_or_else(|| invitation_not_found(invitation_id))
}

fn invitation_not_found(invitation_id: Uuid) -> Error<'static> {
    ErrorKind::NotFound
        .with_message(format!("Invitation not found: {invitation_id}"))
        .with_resource("invitation")
}

fn already_resolved(invitation: &InvitationModel) -> Error<'static> {
    ErrorKind::Conflict
        .with_message(format!("Invitation was already {}", invitation.status))
        .with_resource("invitation")
}

/// Moves a pending invitation addressed to the caller to `next`.
///
/// Acceptance also adds the receiver to the team as a member.
async fn answer_invitation(
    conn: &mut PgConn,
    auth_state: &AuthContext,
    invitation_id: Uuid,
    next: InvitationStatus,
) -> Result<InvitationModel> {
    let receiver_id = auth_state.account_id;
    conn.transaction(|conn| {
        Box::pin(async move {
            let invitation = conn
                .find_invitation_for_update(invitation_id)
                .await?
                .ok_or_else(|| invitation_not_found(invitation_id))?;

            if !invitation.is_addressed_to(receiver_id) {
                return Err(ErrorKind::Forbidden
                    .with_message("Only the receiver can answer an invitation")
                    .with_resource("invitation"));
            }

            let Some(updates) = invitation.respond(next) else {
                return Err(already_resolved(&invitation));
            };
            let invitation = conn.update_invitation(invitation.id, updates).await?;

            if next == InvitationStatus::Accepted {
                let project_id = invitation.project_id;
                let Some(team) = conn.find_team_by_project(project_id).await? else {
                    return Err(ErrorKind::NotFound
                        .with_message(format!("Team not found for project {project_id}"))
                        .with_resource("team"));
                };
                let new_member = NewTeamMember::new(team.id, receiver_id, TeamRole::Member);
                conn.get_or_create_team_member(new_member).await?;
            }

            Ok::<InvitationModel, Error<'static>>(invitation)
        })
    })
    .await
}

/// Lists the invitations visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_invitations(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(filter): Query<InvitationFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Invitations>)> {
    let invitations = conn
        .list_scoped_invitations(auth_state.access_scope(), filter.status, pagination.into())
        .await?;

    let response = invitations.into_iter().map(Invitation::from_model).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn list_invitations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List invitations")
        .description(
            "Lists invitations under the projects visible to the caller plus, for students, the \
             invitations they received. Newest first.",
        )
        .response::<200, Json<Invitations>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Invites a student to a project's team.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %request.project_id, receiver_id = %request.receiver_id))]
async fn create_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateInvitation>,
) -> Result<(StatusCode, Json<Invitation>)> {
    let (project, _) = auth_state
        .authorize_team_member(&mut conn, request.project_id, Permission::InviteMembers)
        .await?;

    let receiver = find_account(&mut conn, request.receiver_id).await?;
    if !receiver.capabilities().receive_invitations {
        return Err(ErrorKind::BadRequest
            .with_message("Only students can be invited to a team")
            .with_resource("invitation"));
    }

    if conn
        .find_membership_in_project(project.id, receiver.id)
        .await?
        .is_some()
    {
        return Err(ErrorKind::BadRequest
            .with_message("Account is already a member of this team")
            .with_resource("invitation"));
    }

    if let Some(existing) = conn.find_project_invitation(project.id, receiver.id).await? {
        return Err(ErrorKind::BadRequest
            .with_message("This student has already been invited to the project")
            .with_context(format!("Existing invitation is {}", existing.status))
            .with_resource("invitation"));
    }

    let invitation = conn
        .create_invitation(request.into_model(auth_state.account_id))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        invitation_id = %invitation.id,
        "Invitation sent"
    );

    Ok((StatusCode::CREATED, Json(Invitation::from_model(invitation))))
}

fn create_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create invitation")
        .description(
            "Invites a student to the project's team. Team leaders and co-leaders only. A \
             student can be invited to a project once.",
        )
        .response::<201, Json<Invitation>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an invitation to its sender, its receiver or anyone who can view
/// the project.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, invitation_id = %path_params.invitation_id))]
async fn read_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InvitationPathParams>,
) -> Result<(StatusCode, Json<Invitation>)> {
    let invitation = find_invitation(&mut conn, path_params.invitation_id).await?;

    let is_party = invitation.is_addressed_to(auth_state.account_id)
        || invitation.sender_id == auth_state.account_id;
    if !is_party {
        auth_state
            .authorize_project(&mut conn, invitation.project_id, Permission::ViewProject)
            .await?;
    }

    Ok((StatusCode::OK, Json(Invitation::from_model(invitation))))
}

fn read_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get invitation")
        .response::<200, Json<Invitation>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Withdraws a pending invitation.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, invitation_id = %path_params.invitation_id))]
async fn cancel_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InvitationPathParams>,
) -> Result<StatusCode> {
    let invitation = find_invitation(&mut conn, path_params.invitation_id).await?;

    if invitation.sender_id != auth_state.account_id {
        let membership = conn
            .find_membership_in_project(invitation.project_id, auth_state.account_id)
            .await?;
        if !membership.is_some_and(|m| m.is_leader()) {
            return Err(ErrorKind::Forbidden
                .with_message("Only the sender or a team leader can cancel an invitation")
                .with_resource("invitation"));
        }
    }

    let invitation_id = invitation.id;
    conn.transaction(|conn| {
        Box::pin(async move {
            let invitation = conn
                .find_invitation_for_update(invitation_id)
                .await?
                .ok_or_else(|| invitation_not_found(invitation_id))?;

            if !invitation.is_pending() {
                return Err(already_resolved(&invitation));
            }

            conn.delete_invitation(invitation.id).await?;
            Ok::<(), Error<'static>>(())
        })
    })
    .await?;

    tracing::info!(target: TRACING_TARGET, "Invitation cancelled");
    Ok(StatusCode::NO_CONTENT)
}

fn cancel_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Cancel invitation")
        .description("Deletes a pending invitation. The sender or a team leader only.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Accepts an invitation and joins the team.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, invitation_id = %path_params.invitation_id))]
async fn accept_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InvitationPathParams>,
) -> Result<(StatusCode, Json<Invitation>)> {
    let invitation = answer_invitation(
        &mut conn,
        &auth_state,
        path_params.invitation_id,
        InvitationStatus::Accepted,
    )
    .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = %invitation.project_id,
        "Invitation accepted, joined team"
    );

    Ok((StatusCode::OK, Json(Invitation::from_model(invitation))))
}

fn accept_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Accept invitation")
        .description(
            "Accepts a pending invitation addressed to the caller and adds the caller to the \
             team as a member. A resolved invitation cannot be answered again.",
        )
        .response::<200, Json<Invitation>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Declines an invitation.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, invitation_id = %path_params.invitation_id))]
async fn decline_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InvitationPathParams>,
) -> Result<(StatusCode, Json<Invitation>)> {
    let invitation = answer_invitation(
        &mut conn,
        &auth_state,
        path_params.invitation_id,
        InvitationStatus::Declined,
    )
    .await?;

    tracing::info!(target: TRACING_TARGET, "Invitation declined");
    Ok((StatusCode::OK, Json(Invitation::from_model(invitation))))
}

fn decline_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Decline invitation")
        .description("Declines a pending invitation addressed to the caller.")
        .response::<200, Json<Invitation>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/invitations/",
            get_with(list_invitations, list_invitations_docs)
                .post_with(create_invitation, create_invitation_docs),
        )
        .api_route(
            "/invitations/{invitationId}/",
            get_with(read_invitation, read_invitation_docs)
                .delete_with(cancel_invitation, cancel_invitation_docs),
        )
        .api_route(
            "/invitations/{invitationId}/accept/",
            post_with(accept_invitation, accept_invitation_docs),
        )
        .api_route(
            "/invitations/{invitationId}/decline/",
            post_with(decline_invitation, decline_invitation_docs),
        )
        .with_path_items(|item| item.tag("Invitations"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_invitations_conflict() {
        let now = jiff::Timestamp::now();
        let invitation = InvitationModel {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            status: InvitationStatus::Accepted,
            sent_at: now.into(),
            responded_at: Some(now.into()),
        };

        assert!(invitation.respond(InvitationStatus::Declined).is_none());
        let error = already_resolved(&invitation);
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), Some("Invitation was already ACCEPTED"));
    }
}
