//! Authenticated caller verified against the database.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use uniteam_postgres::PgClient;
use uniteam_postgres::model::Account;
use uniteam_postgres::query::AccountRepository;
use uniteam_postgres::types::AccountRole;
use uuid::Uuid;

use super::{AuthHeader, AuthProvider};
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Identity of the caller as stored at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub token_id: Uuid,
    /// Role read from the account row, not from the token.
    pub account_role: AccountRole,
}

impl AuthProvider for AuthContext {
    #[inline]
    fn account_id(&self) -> Uuid {
        self.account_id
    }

    #[inline]
    fn account_role(&self) -> AccountRole {
        self.account_role
    }
}

/// Extractor for an authenticated caller.
///
/// Verifies the bearer token, then re-reads the account so that deleted
/// accounts, revoked lecturer approvals and role changes take effect on the
/// next request. The result is cached in the request extensions.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthContext);

impl AuthState {
    /// Wraps a context that has already been checked against the database.
    #[inline]
    pub const fn from_verified_context(context: AuthContext) -> Self {
        Self(context)
    }

    /// Verifies the token holder against the stored account.
    pub async fn from_unverified_header(auth_header: AuthHeader, pg_client: PgClient) -> Result<Self> {
        let auth_claims = auth_header.into_auth_claims();

        let mut conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %auth_claims.account_id,
                "Database connection failed during authentication"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication verification is temporarily unavailable")
                .with_resource("authentication")
        })?;

        let account = conn.find_account_by_id(auth_claims.account_id).await?;
        let account = Self::verify_account_status(account, auth_claims.account_id)?;

        if account.account_role != auth_claims.account_role {
            tracing::info!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                token_role = %auth_claims.account_role,
                current_role = %account.account_role,
                "Account role changed since the token was issued"
            );
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            token_id = %auth_claims.token_id,
            role = %account.account_role,
            "Caller authenticated"
        );

        Ok(Self::from_verified_context(AuthContext {
            account_id: account.id,
            token_id: auth_claims.token_id,
            account_role: account.account_role,
        }))
    }

    fn verify_account_status(account: Option<Account>, account_id: Uuid) -> Result<Account> {
        let Some(account) = account else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account_id,
                "Token refers to a deleted account"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account not found")
                .with_context("Your account may have been removed")
                .with_resource("authentication"));
        };

        if !account.can_login() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                "Token used by an account awaiting approval"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account is awaiting administrator approval")
                .with_resource("authentication"));
        }

        Ok(account)
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let pg_client = PgClient::from_ref(state);
        let auth_state = Self::from_unverified_header(auth_header, pg_client).await?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(auth_state) => Ok(Some(auth_state)),
            Err(_) => Ok(None),
        }
    }
}

impl aide::OperationInput for AuthState {
    fn operation_input(
        _ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        let requirement = [("bearerAuth".to_owned(), Vec::new())].into_iter().collect();
        operation.security.push(requirement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: AccountRole, is_approved: bool) -> Account {
        let now = jiff::Timestamp::now();
        Account {
            id: Uuid::new_v4(),
            username: "grace".to_owned(),
            email_address: "grace@uni.example".to_owned(),
            password_hash: String::new(),
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            phone_number: None,
            account_role: role,
            is_approved,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn rejects_deleted_accounts() {
        let error = AuthState::verify_account_status(None, Uuid::new_v4()).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn rejects_unapproved_lecturers() {
        let error =
            AuthState::verify_account_status(Some(account(AccountRole::Lecturer, false)), Uuid::new_v4()).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn accepts_approved_accounts() {
        let lecturer = account(AccountRole::Lecturer, true);
        let id = lecturer.id;
        let verified = AuthState::verify_account_status(Some(lecturer), id);
        assert!(verified.is_ok());
    }

    #[test]
    fn context_derives_scope_and_capabilities() {
        let context = AuthContext {
            account_id: Uuid::new_v4(),
            token_id: Uuid::new_v4(),
            account_role: AccountRole::Lecturer,
        };

        assert!(context.capabilities().author_templates);
        assert!(!context.is_admin());
        assert!(context.authorize_admin().is_err());
        assert!(context.authorize_self(context.account_id).is_ok());
        assert!(context.authorize_self(Uuid::new_v4()).is_err());
        assert_eq!(
            context.access_scope(),
            uniteam_postgres::types::AccessScope::Supervisor(context.account_id)
        );
    }
}
