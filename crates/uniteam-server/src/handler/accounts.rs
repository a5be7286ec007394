//! Account management handlers.
//!
//! Administrators list, create, edit, approve and delete accounts. Every
//! account may read and edit itself, but only an administrator changes a
//! role or an approval flag.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use uniteam_postgres::model::{
    Account, NewProfile, Profile as ProfileModel, UpdateAccount as UpdateAccountModel,
};
use uniteam_postgres::query::{
    AccountRepository, ProfileRepository, ProjectRepository, TeamMemberRepository,
};
use uniteam_postgres::{PgConnection, PgError};
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    AccountFilter, AccountPathParams, CreateAccount, Pagination, StudentSearch, UpdateAccount,
};
use crate::handler::response::{
    Account as AccountResponse, AccountSummaries, AccountSummary, AccountWithProfile, Accounts,
    ErrorResponse, Profile,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordHasher, PasswordStrength, ServiceState};

/// Tracing target for account operations.
const TRACING_TARGET: &str = "uniteam_server::handler::accounts";

/// Loads an account or fails with `not_found`.
pub(crate) async fn find_account(conn: &mut PgConnection, account_id: Uuid) -> Result<Account> {
    conn.find_account_by_id(account_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message(format!("Account not found: {account_id}"))
            .with_resource("account")
    })
}

async fn ensure_unique_identity(
    conn: &mut PgConnection,
    username: Option<&str>,
    email_address: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<()> {
    if let Some(username) = username
        && conn.username_exists(username, exclude).await?
    {
        return Err(ErrorKind::Conflict
            .with_message("Username is already taken")
            .with_resource("account"));
    }

    if let Some(email_address) = email_address
        && conn.email_exists(email_address, exclude).await?
    {
        return Err(ErrorKind::Conflict
            .with_message("An account with this email address already exists")
            .with_resource("account"));
    }

    Ok(())
}

/// Returns the caller's account and profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn read_current_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<AccountWithProfile>)> {
    let account = find_account(&mut conn, auth_state.account_id).await?;
    let profile = conn.find_profile(account.id, account.account_role).await?;

    Ok((StatusCode::OK, Json(AccountWithProfile::from_model(account, profile))))
}

fn read_current_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get current account")
        .description("Returns the authenticated account together with its role profile.")
        .response::<200, Json<AccountWithProfile>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Lists accounts, optionally filtered by role.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_accounts(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(filter): Query<AccountFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Accounts>)> {
    auth_state.authorize_admin()?;

    let accounts = conn.list_accounts(filter.role, pagination.into()).await?;
    let response = accounts.into_iter().map(AccountResponse::from_model).collect();

    Ok((StatusCode::OK, Json(response)))
}

fn list_accounts_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List accounts")
        .description("Lists every account, newest first. Administrators only.")
        .response::<200, Json<Accounts>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Creates an account of any role with its profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, role = %request.account_role))]
async fn create_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    State(password_hasher): State<PasswordHasher>,
    State(password_strength): State<PasswordStrength>,
    ValidateJson(request): ValidateJson<CreateAccount>,
) -> Result<(StatusCode, Json<AccountWithProfile>)> {
    auth_state.authorize_admin()?;

    let user_inputs = [
        request.username.as_str(),
        request.email_address.as_str(),
        request.first_name.as_str(),
        request.last_name.as_str(),
    ];
    password_strength.validate_password(&request.password, &user_inputs)?;

    ensure_unique_identity(
        &mut conn,
        Some(&request.username),
        Some(&request.email_address),
        None,
    )
    .await?;

    let password_hash = password_hasher.hash_password(&request.password)?;
    let new_account = request.into_model(password_hash);

    let (account, profile) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let account = conn.create_account(new_account).await?;
                let new_profile = NewProfile::for_role(account.id, account.account_role);
                let profile = conn.create_profile(new_profile).await?;
                Ok::<(Account, ProfileModel), Error<'static>>((account, profile))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        created_account_id = %account.id,
        role = %account.account_role,
        "Account created by administrator"
    );

    let response = AccountWithProfile::from_model(account, Some(profile));
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create account")
        .description("Creates an account of any role with an empty profile. Administrators only.")
        .response::<201, Json<AccountWithProfile>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Searches students for the invitation picker.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn search_students(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(search): Query<StudentSearch>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<AccountSummaries>)> {
    let exclude_team_id = match search.exclude_project_id {
        Some(project_id) => {
            let team = conn.find_team_by_project(project_id).await?.ok_or_else(|| {
                ErrorKind::NotFound
                    .with_message(format!("Project not found: {project_id}"))
                    .with_resource("project")
            })?;
            Some(team.id)
        }
        None => None,
    };

    let students = conn
        .search_students(search.term(), exclude_team_id, pagination.into())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        results = students.len(),
        "Student search completed"
    );

    let response = students.iter().map(AccountSummary::from_model).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn search_students_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Search students")
        .description(
            "Matches students by username, name or email. With `excludeProjectId`, members of \
             that project's team are left out.",
        )
        .response::<200, Json<AccountSummaries>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an account with its profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, target_account_id = %path_params.account_id))]
async fn read_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<AccountWithProfile>)> {
    let account = find_account(&mut conn, path_params.account_id).await?;
    let profile = conn.find_profile(account.id, account.account_role).await?;

    Ok((StatusCode::OK, Json(AccountWithProfile::from_model(account, profile))))
}

fn read_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get account")
        .description("Returns an account with its profile to any authenticated caller.")
        .response::<200, Json<AccountWithProfile>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Applies a partial update to an account.
///
/// A role change deletes the old profile and creates an empty one for the
/// new role in the same transaction.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, target_account_id = %path_params.account_id))]
async fn update_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    State(password_hasher): State<PasswordHasher>,
    State(password_strength): State<PasswordStrength>,
    Path(path_params): Path<AccountPathParams>,
    ValidateJson(request): ValidateJson<UpdateAccount>,
) -> Result<(StatusCode, Json<AccountWithProfile>)> {
    auth_state.authorize_self(path_params.account_id)?;

    if (request.account_role.is_some() || request.is_approved.is_some()) && !auth_state.is_admin() {
        return Err(ErrorKind::Forbidden
            .with_message("Only administrators can change roles or approval")
            .with_resource("account"));
    }

    let target = find_account(&mut conn, path_params.account_id).await?;

    let password_hash = match request.password.as_deref() {
        Some(password) => {
            let user_inputs = [
                request.username.as_deref().unwrap_or(&target.username),
                request.email_address.as_deref().unwrap_or(&target.email_address),
                request.first_name.as_deref().unwrap_or(&target.first_name),
                request.last_name.as_deref().unwrap_or(&target.last_name),
            ];
            password_strength.validate_password(password, &user_inputs)?;
            Some(password_hasher.hash_password(password)?)
        }
        None => None,
    };

    let updates: UpdateAccountModel = request.into_model(password_hash);
    ensure_unique_identity(
        &mut conn,
        updates.username.as_deref(),
        updates.email_address.as_deref(),
        Some(target.id),
    )
    .await?;

    let role_changed = updates
        .account_role
        .is_some_and(|role| role != target.account_role);

    let target_id = target.id;
    let (account, profile) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let account = conn.update_account(target_id, updates).await?;
                let profile = if role_changed {
                    conn.delete_profiles(account.id).await?;
                    let new_profile = NewProfile::for_role(account.id, account.account_role);
                    Some(conn.create_profile(new_profile).await?)
                } else {
                    conn.find_profile(account.id, account.account_role).await?
                };
                Ok::<_, PgError>((account, profile))
            })
        })
        .await?;

    if role_changed {
        tracing::info!(
            target: TRACING_TARGET,
            target_account_id = %account.id,
            previous_role = %target.account_role,
            role = %account.account_role,
            "Account role changed, profile replaced"
        );
    } else {
        tracing::info!(target: TRACING_TARGET, target_account_id = %account.id, "Account updated");
    }

    Ok((StatusCode::OK, Json(AccountWithProfile::from_model(account, profile))))
}

fn update_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update account")
        .description(
            "Updates the supplied fields. Changing `accountRole` or `isApproved` requires an \
             administrator; a role change replaces the profile with an empty one.",
        )
        .response::<200, Json<AccountWithProfile>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Deletes an account unless it is the only leader of some team.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, target_account_id = %path_params.account_id))]
async fn delete_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<StatusCode> {
    auth_state.authorize_admin()?;

    let target_account_id = path_params.account_id;
    conn.transaction(|conn| {
        Box::pin(async move {
            let sole_leader_teams = conn.list_sole_leader_teams(target_account_id).await?;
            if !sole_leader_teams.is_empty() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    target_account_id = %target_account_id,
                    teams = sole_leader_teams.len(),
                    "Account deletion refused: sole team leader"
                );
                return Err(ErrorKind::Conflict
                    .with_message("Account is the only leader of at least one team")
                    .with_suggestion("Promote another member to leader first")
                    .with_resource("account"));
            }

            if !conn.delete_account(target_account_id).await? {
                return Err(ErrorKind::NotFound
                    .with_message(format!("Account not found: {target_account_id}"))
                    .with_resource("account"));
            }

            Ok::<(), Error<'static>>(())
        })
    })
    .await?;

    tracing::info!(target: TRACING_TARGET, target_account_id = %target_account_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete account")
        .description(
            "Deletes an account with its profile, memberships, assignments and invitations. \
             Refused while the account is the only leader of a team. Administrators only.",
        )
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Sets the approval flag of a lecturer account.
async fn set_lecturer_approval(
    conn: &mut PgConnection,
    account_id: Uuid,
    next: impl FnOnce(bool) -> bool,
) -> Result<Account> {
    let target = find_account(conn, account_id).await?;
    if !target.account_role.requires_approval() {
        return Err(ErrorKind::BadRequest
            .with_message("Only lecturer accounts go through approval")
            .with_resource("account"));
    }

    let updates = UpdateAccountModel {
        is_approved: Some(next(target.is_approved)),
        ..UpdateAccountModel::default()
    };
    Ok(conn.update_account(target.id, updates).await?)
}

/// Approves a lecturer account.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, target_account_id = %path_params.account_id))]
async fn approve_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    auth_state.authorize_admin()?;

    let account = set_lecturer_approval(&mut conn, path_params.account_id, |_| true).await?;

    tracing::info!(target: TRACING_TARGET, target_account_id = %account.id, "Lecturer approved");
    Ok((StatusCode::OK, Json(AccountResponse::from_model(account))))
}

fn approve_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Approve lecturer")
        .description("Allows a lecturer account to sign in. Administrators only.")
        .response::<200, Json<AccountResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Flips the approval flag of a lecturer account.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, target_account_id = %path_params.account_id))]
async fn toggle_approval(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    auth_state.authorize_admin()?;

    let account =
        set_lecturer_approval(&mut conn, path_params.account_id, |approved| !approved).await?;

    tracing::info!(
        target: TRACING_TARGET,
        target_account_id = %account.id,
        is_approved = account.is_approved,
        "Lecturer approval toggled"
    );
    Ok((StatusCode::OK, Json(AccountResponse::from_model(account))))
}

fn toggle_approval_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Toggle lecturer approval")
        .description("Approves an unapproved lecturer or revokes an approval. Administrators only.")
        .response::<200, Json<AccountResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns the profile of any account.
#[tracing::instrument(skip_all, fields(target_account_id = %path_params.account_id))]
async fn read_account_profile(
    PgPool(mut conn): PgPool,
    AuthState(_): AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<Profile>)> {
    let account = find_account(&mut conn, path_params.account_id).await?;
    let profile = conn
        .find_profile(account.id, account.account_role)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Profile not found for account {}", account.id))
                .with_resource("profile")
        })?;

    Ok((StatusCode::OK, Json(Profile::from_model(profile))))
}

fn read_account_profile_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get account profile")
        .description("Returns the role profile of an account.")
        .response::<200, Json<Profile>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/auth/me/",
            get_with(read_current_account, read_current_account_docs),
        )
        .api_route(
            "/accounts/",
            get_with(list_accounts, list_accounts_docs).post_with(create_account, create_account_docs),
        )
        .api_route(
            "/accounts/students/",
            get_with(search_students, search_students_docs),
        )
        .api_route(
            "/accounts/{accountId}/",
            get_with(read_account, read_account_docs)
                .patch_with(update_account, update_account_docs)
                .delete_with(delete_account, delete_account_docs),
        )
        .api_route(
            "/accounts/{accountId}/approve/",
            post_with(approve_account, approve_account_docs),
        )
        .api_route(
            "/accounts/{accountId}/toggle-approval/",
            post_with(toggle_approval, toggle_approval_docs),
        )
        .api_route(
            "/accounts/{accountId}/profile/",
            get_with(read_account_profile, read_account_profile_docs),
        )
        .with_path_items(|item| item.tag("Accounts"))
}
