//! Registration, login and token refresh handlers.
//!
//! Access and refresh tokens are EdDSA-signed JWTs. Unknown logins still run a
//! password verification so that response time does not reveal which
//! accounts exist.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use uniteam_postgres::model::{Account, NewProfile, Profile as ProfileModel};
use uniteam_postgres::query::{AccountRepository, ProfileRepository};

use crate::extract::{AuthClaims, Json, PgPool, TokenKind, ValidateJson};
use crate::handler::request::{Login, RefreshSession, Register};
use crate::handler::response::{
    Account as AccountResponse, AuthTokens, ErrorResponse, Profile, Registration,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordHasher, PasswordStrength, ServiceState, SessionConfig, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "uniteam_server::handler::authentication";

/// Signs a fresh access and refresh token pair for `account`.
pub(crate) fn issue_tokens(
    session_keys: &SessionKeys,
    session: SessionConfig,
    account: &Account,
) -> Result<AuthTokens> {
    let access = AuthClaims::new(account, TokenKind::Access, session.access_token_ttl());
    let refresh = AuthClaims::new(account, TokenKind::Refresh, session.refresh_token_ttl());

    let expires_at = jiff::Timestamp::from_second(access.expires_at).map_err(|e| {
        tracing::error!(target: TRACING_TARGET, error = %e, "Token expiry out of range");
        ErrorKind::InternalServerError
            .with_message("Authentication token generation failed")
            .with_resource("authentication")
    })?;

    Ok(AuthTokens {
        access_token: access.encode(session_keys.encoding_key())?,
        refresh_token: refresh.encode(session_keys.encoding_key())?,
        token_type: "Bearer".to_owned(),
        expires_in: access.remaining_seconds(),
        account_id: account.id,
        expires_at,
    })
}

/// Creates a student or lecturer account with its profile.
#[tracing::instrument(skip_all, fields(username = %request.username, role = %request.account_role))]
async fn register(
    PgPool(mut conn): PgPool,
    State(password_hasher): State<PasswordHasher>,
    State(password_strength): State<PasswordStrength>,
    State(session_keys): State<SessionKeys>,
    State(session): State<SessionConfig>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<Registration>)> {
    tracing::trace!(target: TRACING_TARGET, "Registration attempt");

    password_strength.validate_password(&request.password, &request.user_inputs())?;

    if conn.username_exists(&request.username, None).await? {
        return Err(ErrorKind::Conflict
            .with_message("Username is already taken")
            .with_resource("account"));
    }

    if conn.email_exists(&request.email_address, None).await? {
        return Err(ErrorKind::Conflict
            .with_message("An account with this email address already exists")
            .with_resource("account"));
    }

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

    let tokens = if account.can_login() {
        Some(issue_tokens(&session_keys, session, &account)?)
    } else {
        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "Account awaits approval, no tokens issued"
        );
        None
    };

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        role = %account.account_role,
        "Account registered"
    );

    let response = Registration {
        account: AccountResponse::from_model(account),
        profile: Profile::from_model(profile),
        tokens,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

fn register_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register")
        .description(
            "Creates a student or lecturer account and its profile. Lecturers receive no \
             tokens until an administrator approves them.",
        )
        .response::<201, Json<Registration>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Authenticates with a username or email address and a password.
#[tracing::instrument(skip_all)]
async fn login(
    PgPool(mut conn): PgPool,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    State(session): State<SessionConfig>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, Json<AuthTokens>)> {
    tracing::trace!(target: TRACING_TARGET, "Login attempt");

    let account = conn.find_account_by_login(&request.login).await?;

    let password_valid = match &account {
        Some(account) => password_hasher
            .verify_password(&request.password, &account.password_hash)
            .is_ok(),
        None => password_hasher.verify_dummy_password(&request.password),
    };

    let account = match account {
        Some(account) if password_valid && account.can_login() => account,
        Some(account) if password_valid => {
            tracing::warn!(
                target: TRACING_TARGET,
                account_id = %account.id,
                "Login refused: lecturer awaiting approval"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account is awaiting administrator approval")
                .with_resource("authentication"));
        }
        account => {
            tracing::warn!(
                target: TRACING_TARGET,
                account_exists = account.is_some(),
                "Login failed"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Invalid username or password")
                .with_resource("authentication"));
        }
    };

    if let Err(e) = conn.record_login(account.id).await {
        tracing::error!(
            target: TRACING_TARGET,
            account_id = %account.id,
            error = %e,
            "Failed to record login"
        );
    }

    let tokens = issue_tokens(&session_keys, session, &account)?;

    tracing::info!(target: TRACING_TARGET, account_id = %account.id, "Login successful");
    Ok((StatusCode::OK, Json(tokens)))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log in")
        .description("Exchanges a username or email address and a password for a token pair.")
        .response::<200, Json<AuthTokens>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Exchanges a refresh token for a new token pair.
#[tracing::instrument(skip_all)]
async fn refresh(
    PgPool(mut conn): PgPool,
    State(session_keys): State<SessionKeys>,
    State(session): State<SessionConfig>,
    ValidateJson(request): ValidateJson<RefreshSession>,
) -> Result<(StatusCode, Json<AuthTokens>)> {
    let claims = AuthClaims::decode(
        &request.refresh_token,
        session_keys.decoding_key(),
        TokenKind::Refresh,
    )?;

    let account = match conn.find_account_by_id(claims.account_id).await? {
        Some(account) if account.can_login() => account,
        _ => {
            tracing::warn!(
                target: TRACING_TARGET,
                account_id = %claims.account_id,
                token_id = %claims.token_id,
                "Refresh refused: account missing or not approved"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account is no longer allowed to sign in")
                .with_resource("authentication"));
        }
    };

    let tokens = issue_tokens(&session_keys, session, &account)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        previous_token_id = %claims.token_id,
        "Session refreshed"
    );

    Ok((StatusCode::OK, Json(tokens)))
}

fn refresh_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Refresh session")
        .description("Issues a new token pair for a valid refresh token.")
        .response::<200, Json<AuthTokens>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the public authentication routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/register/", post_with(register, register_docs))
        .api_route("/auth/login/", post_with(login, login_docs))
        .api_route("/auth/refresh/", post_with(refresh, refresh_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

#[cfg(test)]
mod tests {
    use uniteam_postgres::types::AccountRole;
    use uuid::Uuid;

    use super::*;
    use crate::service::tests::test_state;

    fn account(role: AccountRole) -> Account {
        let now = jiff::Timestamp::now();
        Account {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email_address: "ada@uni.example".into(),
            password_hash: String::new(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone_number: None,
            account_role: role,
            is_approved: true,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn issued_tokens_have_distinct_kinds() -> anyhow::Result<()> {
        let state = test_state();
        let account = account(AccountRole::Student);
        let tokens = issue_tokens(&state.session_keys, state.session, &account)?;

        let keys = state.session_keys.decoding_key();
        let access = AuthClaims::decode(&tokens.access_token, keys, TokenKind::Access)?;
        let refresh = AuthClaims::decode(&tokens.refresh_token, keys, TokenKind::Refresh)?;

        assert_eq!(access.account_id, account.id);
        assert_eq!(refresh.account_id, account.id);
        assert!(AuthClaims::decode(&tokens.refresh_token, keys, TokenKind::Access).is_err());
        assert_eq!(tokens.token_type, "Bearer");
        assert!(tokens.expires_in > 0 && tokens.expires_in <= 3600);
        Ok(())
    }
}
