//! Handlers for the caller's own role profile.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use uniteam_postgres::model::Profile as ProfileModel;
use uniteam_postgres::query::ProfileRepository;
use uniteam_postgres::types::AccountRole;

use crate::extract::{AuthState, Json, PgPool, ValidateJson};
use crate::handler::request::UpdateProfile;
use crate::handler::response::{ErrorResponse, Profile};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for profile operations.
const TRACING_TARGET: &str = "uniteam_server::handler::profiles";

/// Returns the caller's profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn read_profile(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<Profile>)> {
    let Some(profile) = conn
        .find_profile(auth_state.account_id, auth_state.account_role)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("Profile not found")
            .with_resource("profile"));
    };

    Ok((StatusCode::OK, Json(Profile::from_model(profile))))
}

fn read_profile_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get own profile")
        .description("Returns the profile matching the caller's role.")
        .response::<200, Json<Profile>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates the caller's profile. Fields of other roles are ignored.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, role = %auth_state.account_role))]
async fn update_profile(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<UpdateProfile>,
) -> Result<(StatusCode, Json<Profile>)> {
    let account_id = auth_state.account_id;
    let profile = match auth_state.account_role {
        AccountRole::Student => {
            let updates = request.into_student();
            ProfileModel::Student(conn.update_student_profile(account_id, updates).await?)
        }
        AccountRole::Lecturer => {
            let updates = request.into_lecturer();
            ProfileModel::Lecturer(conn.update_lecturer_profile(account_id, updates).await?)
        }
        AccountRole::Admin => {
            let updates = request.into_admin();
            ProfileModel::Admin(conn.update_admin_profile(account_id, updates).await?)
        }
    };

    tracing::info!(target: TRACING_TARGET, "Profile updated");
    Ok((StatusCode::OK, Json(Profile::from_model(profile))))
}

fn update_profile_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update own profile")
        .description(
            "Updates the supplied fields of the caller's profile. Fields that belong to \
             another role are ignored.",
        )
        .response::<200, Json<Profile>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/profiles/me/",
            get_with(read_profile, read_profile_docs).patch_with(update_profile, update_profile_docs),
        )
        .with_path_items(|item| item.tag("Profiles"))
}
