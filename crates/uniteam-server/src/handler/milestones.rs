//! Milestone handlers.
//!
//! Assignees must be members of the project's team. The check runs inside the
//! write transaction after locking the team row, the same lock member removal
//! takes, so an assignee cannot leave between the check and the insert.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::PgConnection;
use uniteam_postgres::model::{
    Milestone as MilestoneModel, UpdateMilestone as UpdateMilestoneModel, unassignable_accounts,
};
use uniteam_postgres::query::{MilestoneRepository, ProjectRepository, TeamMemberRepository};
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Permission, Query, ValidateJson};
use crate::handler::request::{
    CreateMilestone, MilestoneFilter, MilestonePathParams, Pagination, UpdateMilestone,
    UpdateMilestoneStatus,
};
use crate::handler::response::{ErrorResponse, Milestone, Milestones};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for milestone operations.
const TRACING_TARGET: &str = "uniteam_server::handler::milestones";

async fn find_milestone(conn: &mut PgConnection, milestone_id: Uuid) -> Result<MilestoneModel> {
    conn.find_milestone_by_id(milestone_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message(format!("Milestone not found: {milestone_id}"))
            .with_resource("milestone")
    })
}

async fn load_assignees(conn: &mut PgConnection, milestone_id: Uuid) -> Result<Vec<Uuid>> {
    let assignees = conn.list_milestone_assignees(&[milestone_id]).await?;
    Ok(assignees.into_iter().map(|a| a.account_id).collect())
}

/// Locks the project's team and rejects assignees outside it.
///
/// Must run inside a transaction.
async fn lock_and_check_assignees(
    conn: &mut PgConnection,
    project_id: Uuid,
    assigned_to: &[Uuid],
) -> Result<()> {
    let Some(team) = conn.find_team_by_project(project_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Team not found for project {project_id}"))
            .with_resource("team"));
    };
    conn.lock_team(team.id).await?;

    if assigned_to.is_empty() {
        return Ok(());
    }

    let members = conn.list_project_member_ids(project_id).await?;
    let outsiders = unassignable_accounts(assigned_to, &members);
    if outsiders.is_empty() {
        return Ok(());
    }

    tracing::warn!(
        target: TRACING_TARGET,
        project_id = %project_id,
        outsiders = ?outsiders,
        "Assignees rejected: not team members"
    );

    let listed = outsiders
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(ErrorKind::BadRequest
        .with_message("Milestones can only be assigned to team members")
        .with_context(format!("Not on the team: {listed}"))
        .with_resource("milestone"))
}

/// Lists the milestones visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_milestones(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(filter): Query<MilestoneFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Milestones>)> {
    let milestones = conn
        .list_scoped_milestones(auth_state.access_scope(), filter.project_id, pagination.into())
        .await?;

    let milestone_ids = milestones.iter().map(|m| m.id).collect::<Vec<_>>();
    let assignees = conn.list_milestone_assignees(&milestone_ids).await?;

    Ok((StatusCode::OK, Json(Milestone::from_models(milestones, assignees))))
}

fn list_milestones_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List milestones")
        .description(
            "Lists milestones under the projects visible to the caller, optionally for one \
             project.",
        )
        .response::<200, Json<Milestones>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Creates a milestone with its assignees.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %request.project_id))]
async fn create_milestone(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateMilestone>,
) -> Result<(StatusCode, Json<Milestone>)> {
    auth_state
        .authorize_team_member(&mut conn, request.project_id, Permission::ManageMilestones)
        .await?;

    let (new_milestone, assigned_to) = request.into_model();
    let (milestone, assigned_to) = conn
        .transaction(|conn| {
            Box::pin(async move {
                lock_and_check_assignees(conn, new_milestone.project_id, &assigned_to).await?;

                let milestone = conn.create_milestone(new_milestone).await?;
                if !assigned_to.is_empty() {
                    conn.set_milestone_assignees(milestone.id, &assigned_to).await?;
                }

                Ok::<_, Error<'static>>((milestone, assigned_to))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        milestone_id = %milestone.id,
        assignees = assigned_to.len(),
        "Milestone created"
    );

    Ok((StatusCode::CREATED, Json(Milestone::from_model(milestone, assigned_to))))
}

fn create_milestone_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create milestone")
        .description("Creates a milestone. Team leaders and co-leaders only.")
        .response::<201, Json<Milestone>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a milestone with its assignees.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_id = %path_params.milestone_id))]
async fn read_milestone(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestonePathParams>,
) -> Result<(StatusCode, Json<Milestone>)> {
    let milestone = find_milestone(&mut conn, path_params.milestone_id).await?;
    auth_state
        .authorize_project(&mut conn, milestone.project_id, Permission::ViewProject)
        .await?;

    let assigned_to = load_assignees(&mut conn, milestone.id).await?;
    Ok((StatusCode::OK, Json(Milestone::from_model(milestone, assigned_to))))
}

fn read_milestone_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get milestone")
        .response::<200, Json<Milestone>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Applies a partial update, optionally replacing the assignee set.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_id = %path_params.milestone_id))]
async fn update_milestone(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestonePathParams>,
    ValidateJson(request): ValidateJson<UpdateMilestone>,
) -> Result<(StatusCode, Json<Milestone>)> {
    let milestone = find_milestone(&mut conn, path_params.milestone_id).await?;
    auth_state
        .authorize_team_member(&mut conn, milestone.project_id, Permission::ManageMilestones)
        .await?;

    let (updates, assigned_to): (UpdateMilestoneModel, _) = request.into_model();
    let (milestone_id, project_id) = (milestone.id, milestone.project_id);
    let (milestone, assigned_to) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let assigned_to = match assigned_to {
                    Some(assigned_to) => {
                        lock_and_check_assignees(conn, project_id, &assigned_to).await?;
                        conn.set_milestone_assignees(milestone_id, &assigned_to).await?;
                        assigned_to
                    }
                    None => load_assignees(conn, milestone_id).await?,
                };

                let milestone = conn.update_milestone(milestone_id, updates).await?;
                Ok::<_, Error<'static>>((milestone, assigned_to))
            })
        })
        .await?;

    tracing::info!(target: TRACING_TARGET, "Milestone updated");
    Ok((StatusCode::OK, Json(Milestone::from_model(milestone, assigned_to))))
}

fn update_milestone_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update milestone")
        .description(
            "Updates the supplied fields. `assignedTo` replaces the assignee set and must only \
             name team members. Team leaders and co-leaders only.",
        )
        .response::<200, Json<Milestone>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a milestone with its assignee links.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_id = %path_params.milestone_id))]
async fn delete_milestone(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestonePathParams>,
) -> Result<StatusCode> {
    let milestone = find_milestone(&mut conn, path_params.milestone_id).await?;
    auth_state
        .authorize_team_member(&mut conn, milestone.project_id, Permission::ManageMilestones)
        .await?;

    let milestone_id = milestone.id;
    let deleted = conn
        .transaction(|conn| Box::pin(async move { conn.delete_milestone(milestone_id).await }))
        .await?;

    if !deleted {
        return Err(ErrorKind::NotFound
            .with_message(format!("Milestone not found: {milestone_id}"))
            .with_resource("milestone"));
    }

    tracing::info!(target: TRACING_TARGET, "Milestone deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_milestone_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete milestone")
        .description("Team leaders and co-leaders only.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lets an assignee move a milestone to another status.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_id = %path_params.milestone_id, status = %request.status))]
async fn update_milestone_status(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestonePathParams>,
    ValidateJson(request): ValidateJson<UpdateMilestoneStatus>,
) -> Result<(StatusCode, Json<Milestone>)> {
    let milestone = find_milestone(&mut conn, path_params.milestone_id).await?;

    if !conn
        .is_milestone_assignee(milestone.id, auth_state.account_id)
        .await?
    {
        tracing::warn!(
            target: TRACING_TARGET,
            "Status update refused: caller is not assigned"
        );
        return Err(ErrorKind::Forbidden
            .with_message("Only assignees can update the milestone status")
            .with_resource("milestone"));
    }

    let updates = UpdateMilestoneModel {
        status: Some(request.status),
        ..UpdateMilestoneModel::default()
    };
    let milestone = conn.update_milestone(milestone.id, updates).await?;
    let assigned_to = load_assignees(&mut conn, milestone.id).await?;

    tracing::info!(target: TRACING_TARGET, "Milestone status updated");
    Ok((StatusCode::OK, Json(Milestone::from_model(milestone, assigned_to))))
}

fn update_milestone_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update milestone status")
        .description("Sets the status. Only accounts assigned to the milestone may call it.")
        .response::<200, Json<Milestone>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/milestones/",
            get_with(list_milestones, list_milestones_docs)
                .post_with(create_milestone, create_milestone_docs),
        )
        .api_route(
            "/milestones/{milestoneId}/",
            get_with(read_milestone, read_milestone_docs)
                .patch_with(update_milestone, update_milestone_docs)
                .delete_with(delete_milestone, delete_milestone_docs),
        )
        .api_route(
            "/milestones/{milestoneId}/status/",
            post_with(update_milestone_status, update_milestone_status_docs),
        )
        .with_path_items(|item| item.tag("Milestones"))
}
