//! Team membership handlers.
//!
//! Every role-mutating path (role change, removal, leaving) locks the team
//! row and recounts leaders inside its transaction, so concurrent demotions
//! are serialized and a team never ends up without a leader.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::PgConnection;
use uniteam_postgres::model::{
    NewTeamMember, TeamMember as TeamMemberModel, UpdateTeamMember, leaves_team_leaderless,
};
use uniteam_postgres::query::{
    AccountRepository, MilestoneRepository, ProjectRepository, TeamMemberRepository,
};
use uniteam_postgres::types::TeamRole;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Permission, Query, ValidateJson};
use crate::handler::accounts::find_account;
use crate::handler::request::{AddTeamMember, ChangeMemberRole, MembershipPathParams, Pagination};
use crate::handler::response::{ErrorResponse, TeamMember, TeamMembers};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for team membership operations.
const TRACING_TARGET: &str = "uniteam_server::handler::team_memberships";

/// Loads a membership and the project its team belongs to.
async fn find_membership(
    conn: &mut PgConnection,
    membership_id: Uuid,
) -> Result<(TeamMemberModel, Uuid)> {
    let Some(member) = conn.find_team_member_by_id(membership_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Team membership not found: {membership_id}"))
            .with_resource("team_member"));
    };

    let Some(team) = conn.find_team_by_id(member.team_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Team not found: {}", member.team_id))
            .with_resource("team"));
    };

    Ok((member, team.project_id))
}

/// Checks the caller's team role as read under the team row lock.
///
/// `None` means the caller no longer belongs to the team.
fn ensure_locked_role(caller_role: Option<TeamRole>, permission: Permission) -> Result<()> {
    match caller_role {
        Some(role) if permission.is_permitted_by_role(role) => Ok(()),
        Some(_) => Err(ErrorKind::Forbidden
            .with_message("Your team role does not allow this action")
            .with_resource("permission")),
        None => Err(ErrorKind::Forbidden
            .with_message("Not a member of this project's team")
            .with_resource("permission")),
    }
}

fn last_leader_error() -> Error<'static> {
    ErrorKind::Conflict
        .with_message("A team must keep at least one leader")
        .with_suggestion("Promote another member to leader first")
        .with_resource("team_member")
}

/// Lists the memberships visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_memberships(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<TeamMembers>)> {
    let members = conn
        .list_scoped_team_members(auth_state.access_scope(), pagination.into())
        .await?;

    let account_ids = members.iter().map(|m| m.account_id).collect::<Vec<_>>();
    let accounts = conn.find_accounts_by_ids(&account_ids).await?;

    Ok((StatusCode::OK, Json(TeamMember::from_models(members, &accounts))))
}

fn list_memberships_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List team memberships")
        .description("Lists memberships under the projects visible to the caller.")
        .response::<200, Json<TeamMembers>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Adds an account to a project's team without an invitation.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %request.project_id))]
async fn add_membership(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<AddTeamMember>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    auth_state.authorize_capability(
        |c| c.manage_memberships,
        "Only administrators can add team members directly",
    )?;

    let Some(team) = conn.find_team_by_project(request.project_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Project not found: {}", request.project_id))
            .with_resource("project"));
    };

    let account = find_account(&mut conn, request.account_id).await?;
    if conn.find_team_member(team.id, account.id).await?.is_some() {
        return Err(ErrorKind::Conflict
            .with_message("Account is already a member of this team")
            .with_resource("team_member"));
    }

    let new_member = NewTeamMember::new(team.id, account.id, request.member_role);
    let member = conn.add_team_member(new_member).await?;

    tracing::info!(
        target: TRACING_TARGET,
        membership_id = %member.id,
        member_account_id = %account.id,
        role = %member.member_role,
        "Team member added by administrator"
    );

    Ok((StatusCode::CREATED, Json(TeamMember::from_model(member, Some(&account)))))
}

fn add_membership_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Add team member")
        .description("Adds an account to a project's team directly. Administrators only.")
        .response::<201, Json<TeamMember>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a membership visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, membership_id = %path_params.membership_id))]
async fn read_membership(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MembershipPathParams>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    let (member, project_id) = find_membership(&mut conn, path_params.membership_id).await?;
    auth_state
        .authorize_project(&mut conn, project_id, Permission::ViewProject)
        .await?;

    let account = conn.find_account_by_id(member.account_id).await?;
    Ok((StatusCode::OK, Json(TeamMember::from_model(member, account.as_ref()))))
}

fn read_membership_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get team membership")
        .response::<200, Json<TeamMember>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Removes a member, or lets a member leave.
///
/// The member is also dropped from every milestone of the project.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, membership_id = %path_params.membership_id))]
async fn remove_membership(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MembershipPathParams>,
) -> Result<StatusCode> {
    let (member, project_id) = find_membership(&mut conn, path_params.membership_id).await?;

    let leaving = member.account_id == auth_state.account_id;
    if !leaving {
        auth_state
            .authorize_team_member(&mut conn, project_id, Permission::ManageMembers)
            .await?;
    }

    let membership_id = member.id;
    let team_id = member.team_id;
    let caller_id = auth_state.account_id;
    let unassigned = conn
        .transaction(|conn| {
            Box::pin(async move {
                conn.lock_team(team_id).await?;

                if !leaving {
                    let caller = conn.find_team_member(team_id, caller_id).await?;
                    ensure_locked_role(caller.map(|c| c.member_role), Permission::ManageMembers)?;
                }

                // Re-read under the lock; the role may have changed meanwhile.
                let Some(member) = conn.find_team_member_by_id(membership_id).await? else {
                    return Err(ErrorKind::NotFound
                        .with_message(format!("Team membership not found: {membership_id}"))
                        .with_resource("team_member"));
                };

                let leader_count = conn.count_team_leaders(team_id).await?;
                if leaves_team_leaderless(leader_count, &member, None) {
                    return Err(last_leader_error());
                }

                let unassigned = conn
                    .remove_assignee_from_project(project_id, member.account_id)
                    .await?;
                conn.delete_team_member(member.id).await?;

                Ok::<usize, Error<'static>>(unassigned)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = %project_id,
        member_account_id = %member.account_id,
        leaving,
        unassigned,
        "Team member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

fn remove_membership_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Remove team member")
        .description(
            "Removes a member (team leaders) or leaves the team (own membership). The member is \
             unassigned from the project's milestones. The last leader cannot be removed.",
        )
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Changes a member's team role, keeping at least one leader.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, membership_id = %path_params.membership_id, role = %request.member_role))]
async fn change_role(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MembershipPathParams>,
    ValidateJson(request): ValidateJson<ChangeMemberRole>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    let (member, project_id) = find_membership(&mut conn, path_params.membership_id).await?;
    auth_state
        .authorize_team_member(&mut conn, project_id, Permission::ManageMembers)
        .await?;

    let membership_id = member.id;
    let team_id = member.team_id;
    let caller_id = auth_state.account_id;
    let next_role: TeamRole = request.member_role;
    let member = conn
        .transaction(|conn| {
            Box::pin(async move {
                conn.lock_team(team_id).await?;

                // A concurrent change may have demoted the caller since the
                // check above.
                let caller = conn.find_team_member(team_id, caller_id).await?;
                ensure_locked_role(caller.map(|c| c.member_role), Permission::ManageMembers)?;

                let Some(member) = conn.find_team_member_by_id(membership_id).await? else {
                    return Err(ErrorKind::NotFound
                        .with_message(format!("Team membership not found: {membership_id}"))
                        .with_resource("team_member"));
                };

                let leader_count = conn.count_team_leaders(team_id).await?;
                if leaves_team_leaderless(leader_count, &member, Some(next_role)) {
                    return Err(last_leader_error());
                }

                let updates = UpdateTeamMember {
                    member_role: Some(next_role),
                };
                let member = conn.update_team_member(member.id, updates).await?;
                Ok::<TeamMemberModel, Error<'static>>(member)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = %project_id,
        member_account_id = %member.account_id,
        role = %member.member_role,
        "Team role changed"
    );

    let account = conn.find_account_by_id(member.account_id).await?;
    Ok((StatusCode::OK, Json(TeamMember::from_model(member, account.as_ref()))))
}

fn change_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Change team role")
        .description(
            "Sets a member's team role. Team leaders only; demoting the last leader is refused.",
        )
        .response::<200, Json<TeamMember>>()
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
            "/team-memberships/",
            get_with(list_memberships, list_memberships_docs)
                .post_with(add_membership, add_membership_docs),
        )
        .api_route(
            "/team-memberships/{membershipId}/",
            get_with(read_membership, read_membership_docs)
                .delete_with(remove_membership, remove_membership_docs),
        )
        .api_route(
            "/team-memberships/{membershipId}/change-role/",
            post_with(change_role, change_role_docs),
        )
        .with_path_items(|item| item.tag("Team memberships"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demoted_caller_is_refused_under_lock() {
        let demoted = ensure_locked_role(Some(TeamRole::CoLeader), Permission::ManageMembers);
        assert!(demoted.is_err_and(|e| e.kind() == ErrorKind::Forbidden));

        let removed = ensure_locked_role(None, Permission::ManageMembers);
        assert!(removed.is_err_and(|e| e.kind() == ErrorKind::Forbidden));

        assert!(ensure_locked_role(Some(TeamRole::Leader), Permission::ManageMembers).is_ok());
    }

    #[test]
    fn last_leader_is_a_conflict() {
        let error = last_leader_error();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("team_member"));
    }
}
