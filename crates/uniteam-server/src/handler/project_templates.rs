//! Project template handlers.
//!
//! Lecturers author templates; any authenticated account can browse them.
//! Only the creator or an administrator may change one.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::PgConnection;
use uniteam_postgres::model::{MilestoneTemplate, ProjectTemplate as ProjectTemplateModel};
use uniteam_postgres::query::ProjectTemplateRepository;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    CreateProjectTemplate, Pagination, ProjectTemplateFilter, ProjectTemplatePathParams,
    UpdateProjectTemplate,
};
use crate::handler::response::{ErrorResponse, ProjectTemplate, ProjectTemplates};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for project template operations.
const TRACING_TARGET: &str = "uniteam_server::handler::project_templates";

/// Loads a project template or fails with `not_found`.
pub(crate) async fn find_project_template(
    conn: &mut PgConnection,
    template_id: Uuid,
) -> Result<ProjectTemplateModel> {
    conn.find_project_template_by_id(template_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Project template not found: {template_id}"))
                .with_resource("project_template")
        })
}

/// Lists templates, optionally for one course.
#[tracing::instrument(skip_all)]
async fn list_templates(
    PgPool(mut conn): PgPool,
    AuthState(_): AuthState,
    Query(filter): Query<ProjectTemplateFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<ProjectTemplates>)> {
    let course_code = filter
        .course_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    let templates = conn
        .list_project_templates(course_code, pagination.into())
        .await?;

    let template_ids = templates.iter().map(|t| t.id).collect::<Vec<_>>();
    let steps = conn.list_template_steps(&template_ids).await?;

    Ok((StatusCode::OK, Json(ProjectTemplate::from_models(templates, steps))))
}

fn list_templates_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List project templates")
        .description("Lists templates by title with their ordered milestone templates.")
        .response::<200, Json<ProjectTemplates>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Creates a template with its inline steps.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_template(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateProjectTemplate>,
) -> Result<(StatusCode, Json<ProjectTemplate>)> {
    auth_state.authorize_capability(
        |c| c.author_templates,
        "Only lecturers can create project templates",
    )?;

    let (new_template, steps) = request.into_model(auth_state.account_id);
    let (template, mut steps) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let template = conn.create_project_template(new_template).await?;

                let new_steps = steps
                    .into_iter()
                    .map(|step| step.into_model(template.id))
                    .collect::<Vec<_>>();
                let steps = if new_steps.is_empty() {
                    Vec::new()
                } else {
                    conn.create_milestone_templates(new_steps).await?
                };

                Ok::<(ProjectTemplateModel, Vec<MilestoneTemplate>), Error<'static>>((
                    template, steps,
                ))
            })
        })
        .await?;

    // Insert order breaks ties between equal display orders.
    steps.sort_by_key(|step| step.display_order);

    tracing::info!(
        target: TRACING_TARGET,
        template_id = %template.id,
        steps = steps.len(),
        "Project template created"
    );

    Ok((StatusCode::CREATED, Json(ProjectTemplate::from_model(template, steps))))
}

fn create_template_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create project template")
        .description(
            "Creates a template, optionally with its milestone templates. Lecturers only.",
        )
        .response::<201, Json<ProjectTemplate>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a template with its ordered steps.
#[tracing::instrument(skip_all, fields(template_id = %path_params.template_id))]
async fn read_template(
    PgPool(mut conn): PgPool,
    AuthState(_): AuthState,
    Path(path_params): Path<ProjectTemplatePathParams>,
) -> Result<(StatusCode, Json<ProjectTemplate>)> {
    let template = find_project_template(&mut conn, path_params.template_id).await?;
    let steps = conn.list_template_steps(&[template.id]).await?;

    Ok((StatusCode::OK, Json(ProjectTemplate::from_model(template, steps))))
}

fn read_template_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get project template")
        .response::<200, Json<ProjectTemplate>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Applies a partial update to a template.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, template_id = %path_params.template_id))]
async fn update_template(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectTemplatePathParams>,
    ValidateJson(request): ValidateJson<UpdateProjectTemplate>,
) -> Result<(StatusCode, Json<ProjectTemplate>)> {
    let template = find_project_template(&mut conn, path_params.template_id).await?;
    auth_state.authorize_template(&template)?;

    let template = conn
        .update_project_template(template.id, request.into_model())
        .await?;
    let steps = conn.list_template_steps(&[template.id]).await?;

    tracing::info!(target: TRACING_TARGET, "Project template updated");
    Ok((StatusCode::OK, Json(ProjectTemplate::from_model(template, steps))))
}

fn update_template_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update project template")
        .description("Updates the supplied fields. The creator or an administrator only.")
        .response::<200, Json<ProjectTemplate>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a template and its steps.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, template_id = %path_params.template_id))]
async fn delete_template(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ProjectTemplatePathParams>,
) -> Result<StatusCode> {
    let template = find_project_template(&mut conn, path_params.template_id).await?;
    auth_state.authorize_template(&template)?;

    if !conn.delete_project_template(template.id).await? {
        return Err(ErrorKind::NotFound
            .with_message(format!("Project template not found: {}", template.id))
            .with_resource("project_template"));
    }

    tracing::info!(target: TRACING_TARGET, "Project template deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_template_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete project template")
        .description(
            "Deletes the template and its milestone templates. Projects created from it keep \
             their milestones. The creator or an administrator only.",
        )
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
            "/project-templates/",
            get_with(list_templates, list_templates_docs)
                .post_with(create_template, create_template_docs),
        )
        .api_route(
            "/project-templates/{templateId}/",
            get_with(read_template, read_template_docs)
                .patch_with(update_template, update_template_docs)
                .delete_with(delete_template, delete_template_docs),
        )
        .with_path_items(|item| item.tag("Project templates"))
}
