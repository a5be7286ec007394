//! Milestone template handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::PgConnection;
use uniteam_postgres::model::{MilestoneTemplate as MilestoneTemplateModel, ProjectTemplate};
use uniteam_postgres::query::ProjectTemplateRepository;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::project_templates::find_project_template;
use crate::handler::request::{
    CreateMilestoneTemplate, MilestoneTemplateFilter, MilestoneTemplatePathParams, Pagination,
    UpdateMilestoneTemplate,
};
use crate::handler::response::{ErrorResponse, MilestoneTemplate, MilestoneTemplates};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for milestone template operations.
const TRACING_TARGET: &str = "uniteam_server::handler::milestone_templates";

/// Loads a step together with the template that owns it.
async fn find_step(
    conn: &mut PgConnection,
    milestone_template_id: Uuid,
) -> Result<(MilestoneTemplateModel, ProjectTemplate)> {
    let Some(step) = conn.find_milestone_template_by_id(milestone_template_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Milestone template not found: {milestone_template_id}"))
            .with_resource("milestone_template"));
    };

    let template = find_project_template(conn, step.project_template_id).await?;
    Ok((step, template))
}

#[tracing::instrument(skip_all)]
async fn list_steps(
    PgPool(mut conn): PgPool,
    AuthState(_): AuthState,
    Query(filter): Query<MilestoneTemplateFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<MilestoneTemplates>)> {
    let steps = conn
        .list_milestone_templates(filter.project_template_id, pagination.into())
        .await?;

    let response = steps.into_iter().map(MilestoneTemplate::from_model).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn list_steps_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List milestone templates")
        .description("Lists milestone templates in display order, optionally for one template.")
        .response::<200, Json<MilestoneTemplates>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Appends a step to an existing template.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, template_id = %request.project_template_id))]
async fn create_step(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateMilestoneTemplate>,
) -> Result<(StatusCode, Json<MilestoneTemplate>)> {
    let template = find_project_template(&mut conn, request.project_template_id).await?;
    auth_state.authorize_template(&template)?;

    let Some(step) = conn
        .create_milestone_templates(vec![request.into_model()])
        .await?
        .pop()
    else {
        tracing::error!(target: TRACING_TARGET, "Insert returned no milestone template");
        return Err(ErrorKind::InternalServerError
            .with_message("Milestone template could not be created")
            .with_resource("milestone_template"));
    };

    tracing::info!(
        target: TRACING_TARGET,
        milestone_template_id = %step.id,
        "Milestone template created"
    );

    Ok((StatusCode::CREATED, Json(MilestoneTemplate::from_model(step))))
}

fn create_step_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create milestone template")
        .description("Adds a step to a project template. The creator or an administrator only.")
        .response::<201, Json<MilestoneTemplate>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(skip_all, fields(milestone_template_id = %path_params.milestone_template_id))]
async fn read_step(
    PgPool(mut conn): PgPool,
    AuthState(_): AuthState,
    Path(path_params): Path<MilestoneTemplatePathParams>,
) -> Result<(StatusCode, Json<MilestoneTemplate>)> {
    let (step, _) = find_step(&mut conn, path_params.milestone_template_id).await?;
    Ok((StatusCode::OK, Json(MilestoneTemplate::from_model(step))))
}

fn read_step_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get milestone template")
        .response::<200, Json<MilestoneTemplate>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_template_id = %path_params.milestone_template_id))]
async fn update_step(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestoneTemplatePathParams>,
    ValidateJson(request): ValidateJson<UpdateMilestoneTemplate>,
) -> Result<(StatusCode, Json<MilestoneTemplate>)> {
    let (step, template) = find_step(&mut conn, path_params.milestone_template_id).await?;
    auth_state.authorize_template(&template)?;

    let step = conn
        .update_milestone_template(step.id, request.into_model())
        .await?;

    tracing::info!(target: TRACING_TARGET, "Milestone template updated");
    Ok((StatusCode::OK, Json(MilestoneTemplate::from_model(step))))
}

fn update_step_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update milestone template")
        .description("Updates the supplied fields. The template creator or an administrator only.")
        .response::<200, Json<MilestoneTemplate>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, milestone_template_id = %path_params.milestone_template_id))]
async fn delete_step(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MilestoneTemplatePathParams>,
) -> Result<StatusCode> {
    let (step, template) = find_step(&mut conn, path_params.milestone_template_id).await?;
    auth_state.authorize_template(&template)?;

    conn.delete_milestone_template(step.id).await?;

    tracing::info!(target: TRACING_TARGET, "Milestone template deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_step_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete milestone template")
        .description("The template creator or an administrator only.")
        .response::<204, ()>()
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
            "/milestone-templates/",
            get_with(list_steps, list_steps_docs).post_with(create_step, create_step_docs),
        )
        .api_route(
            "/milestone-templates/{milestoneTemplateId}/",
            get_with(read_step, read_step_docs)
                .patch_with(update_step, update_step_docs)
                .delete_with(delete_step, delete_step_docs),
        )
        .with_path_items(|item| item.tag("Milestone templates"))
}
