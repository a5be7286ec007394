//! Project handlers.
//!
//! Creating a project also creates its team with the creator as leader and,
//! when a template is named, seeds one milestone per template step. Reads are
//! open to team members, the supervisor and administrators; mutations follow
//! the caller's team role.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::PgConnection;
use uniteam_postgres::model::{NewTeam, NewTeamMember, Project as ProjectModel, instantiate_milestones};
use uniteam_postgres::query::{
    AccountRepository, MilestoneRepository, ProjectRepository, ProjectTemplateRepository,
    TeamMemberRepository,
};
use uniteam_postgres::types::TeamRole;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Permission, Query, ValidateJson};
use crate::handler::request::{CreateProject, Pagination, ProjectPathParams, UpdateProject};
use crate::handler::response::{
    AccountSummary, ErrorResponse, Milestone, Milestones, Project, ProjectDetail, Projects, Team,
    TeamMember,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for project operations.
const TRACING_TARGET: &str = "uniteam_server::handler::projects";

/// Loads a project's team with the member accounts, leaders first.
pub(crate) async fn load_team(conn: &mut PgConnection, project_id: Uuid) -> Result<Team> {
    let Some(team) = conn.find_team_by_project(project_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Team not found for project {project_id}"))
            .with_resource("team"));
    };

    let members = conn.list_team_members(team.id).await?;
    let account_ids = members.iter().map(|m| m.account_id).collect::<Vec<_>>();
    let accounts = conn.find_accounts_by_ids(&account_ids).await?;

    Ok(Team::from_model(team, TeamMember::from_models(members, &accounts)))
}

/// Loads a project's milestones with their assignees, by due date.
pub(crate) async fn load_milestones(
    conn: &mut PgConnection,
    project_id: Uuid,
) -> Result<Vec<Milestone>> {
    let milestones = conn.list_project_milestones(project_id).await?;
    let milestone_ids = milestones.iter().map(|m| m.id).collect::<Vec<_>>();
    let assignees = conn.list_milestone_assignees(&milestone_ids).await?;

    Ok(Milestone::from_models(milestones, assignees))
}

async fn load_detail(conn: &mut PgConnection, project: ProjectModel) -> Result<ProjectDetail> {
    let supervisor = match project.supervisor_id {
        Some(supervisor_id) => conn.find_account_by_id(supervisor_id).await?,
        None => None,
    };

    let team = load_team(conn, project.id).await?;
    let milestones = load_milestones(conn, project.id).await?;

    Ok(ProjectDetail {
        project: Project::from_model(project),
        supervisor: supervisor.as_ref().map(AccountSummary::from_model),
        team,
        milestones,
    })
}

/// Checks that `supervisor_id` names a lecturer. Approval is not required.
async fn ensure_supervisor(conn: &mut PgConnection, supervisor_id: Uuid) -> Result<()> {
    let Some(supervisor) = conn.find_account_by_id(supervisor_id).await? else {
        return Err(ErrorKind::BadRequest
            .with_message(format!("Supervisor not found: {supervisor_id}"))
            .with_resource("project"));
    };

    if !supervisor.capabilities().supervise_projects {
        return Err(ErrorKind::BadRequest
            .with_message("Project supervisor must be a lecturer")
            .with_resource("project"));
    }

    Ok(())
}

/// Lists the projects visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_projects(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Projects>)> {
    let projects = conn
        .list_projects(auth_state.access_scope(), pagination.into())
        .await?;

    let response = projects.into_iter().map(Project::from_model).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn list_projects_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List projects")
        .description(
            "Students see the projects they are on, lecturers the ones they supervise or \
             belong to, administrators every project. Nearest deadline first.",
        )
        .response::<200, Json<Projects>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Creates a project, its team and the template milestones.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_project(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateProject>,
) -> Result<(StatusCode, Json<ProjectDetail>)> {
    if let Some(supervisor_id) = request.supervisor_id {
        ensure_supervisor(&mut conn, supervisor_id).await?;
    }

    let steps = match request.template_id {
        Some(template_id) => {
            if conn.find_project_template_by_id(template_id).await?.is_none() {
                return Err(ErrorKind::BadRequest
                    .with_message(format!("Project template not found: {template_id}"))
                    .with_resource("project_template"));
            }
            conn.list_template_steps(&[template_id]).await?
        }
        None => Vec::new(),
    };

    let creator_id = auth_state.account_id;
    let new_project = request.into_model(creator_id);

    let project = conn
        .transaction(|conn| {
            Box::pin(async move {
                let project = conn.create_project(new_project).await?;
                let team = conn.create_team(NewTeam { project_id: project.id }).await?;

                let leader = NewTeamMember::new(team.id, creator_id, TeamRole::Leader);
                conn.add_team_member(leader).await?;

                let seeded = instantiate_milestones(&steps, project.id, project.deadline());
                if !seeded.is_empty() {
                    conn.create_milestones(seeded).await?;
                }

                Ok::<ProjectModel, Error<'static>>(project)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = %project.id,
        template_id = ?project.template_id,
        "Project created"
    );

    let response = load_detail(&mut conn, project).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create project")
        .description(
            "Creates a project and its team with the caller as leader. With `templateId`, one \
             pending milestone per template step is created, due on the project deadline.",
        )
        .response::<201, Json<ProjectDetail>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a project with its supervisor, team and milestones.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %path_params.project_id))]
async fn read_project(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<ProjectDetail>)> {
    let (project, _) = auth_state
        .authorize_project(&mut conn, path_params.project_id, Permission::ViewProject)
        .await?;

    let response = load_detail(&mut conn, project).await?;
    Ok((StatusCode::OK, Json(response)))
}

fn read_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get project")
        .description("Returns the project with its supervisor, team roster and milestones.")
        .response::<200, Json<ProjectDetail>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Applies a partial update to a project.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %path_params.project_id))]
async fn update_project(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectPathParams>,
    ValidateJson(request): ValidateJson<UpdateProject>,
) -> Result<(StatusCode, Json<Project>)> {
    let (project, _) = auth_state
        .authorize_team_member(&mut conn, path_params.project_id, Permission::UpdateProject)
        .await?;

    if let Some(Some(supervisor_id)) = request.supervisor_id {
        ensure_supervisor(&mut conn, supervisor_id).await?;
    }

    let project = conn.update_project(project.id, request.into_model()).await?;

    tracing::info!(target: TRACING_TARGET, "Project updated");
    Ok((StatusCode::OK, Json(Project::from_model(project))))
}

fn update_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update project")
        .description("Updates the supplied fields. Team leaders only.")
        .response::<200, Json<Project>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a project with its team, memberships, milestones and invitations.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %path_params.project_id))]
async fn delete_project(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<StatusCode> {
    let (project, _) = auth_state
        .authorize_team_member(&mut conn, path_params.project_id, Permission::DeleteProject)
        .await?;

    let project_id = project.id;
    let deleted = conn
        .transaction(|conn| Box::pin(async move { conn.delete_project_cascade(project_id).await }))
        .await?;

    if !deleted {
        return Err(ErrorKind::NotFound
            .with_message(format!("Project not found: {project_id}"))
            .with_resource("project"));
    }

    tracing::info!(target: TRACING_TARGET, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete project")
        .description(
            "Deletes the project together with its team, memberships, milestones, assignments \
             and invitations. Team leaders only.",
        )
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a project's team roster.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %path_params.project_id))]
async fn read_project_team(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<Team>)> {
    let (project, _) = auth_state
        .authorize_project(&mut conn, path_params.project_id, Permission::ViewProject)
        .await?;

    let team = load_team(&mut conn, project.id).await?;
    Ok((StatusCode::OK, Json(team)))
}

fn read_project_team_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get project team")
        .description("Returns the team with its members, leaders first.")
        .response::<200, Json<Team>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a project's milestones.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, project_id = %path_params.project_id))]
async fn list_project_milestones(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<Milestones>)> {
    let (project, _) = auth_state
        .authorize_project(&mut conn, path_params.project_id, Permission::ViewProject)
        .await?;

    let milestones = load_milestones(&mut conn, project.id).await?;
    Ok((StatusCode::OK, Json(milestones)))
}

fn list_project_milestones_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List project milestones")
        .description("Returns the project's milestones with their assignees, by due date.")
        .response::<200, Json<Milestones>>()
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
            "/projects/",
            get_with(list_projects, list_projects_docs).post_with(create_project, create_project_docs),
        )
        .api_route(
            "/projects/{projectId}/",
            get_with(read_project, read_project_docs)
                .patch_with(update_project, update_project_docs)
                .delete_with(delete_project, delete_project_docs),
        )
        .api_route(
            "/projects/{projectId}/team/",
            get_with(read_project_team, read_project_team_docs),
        )
        .api_route(
            "/projects/{projectId}/milestones/",
            get_with(list_project_milestones, list_project_milestones_docs),
        )
        .with_path_items(|item| item.tag("Projects"))
}
