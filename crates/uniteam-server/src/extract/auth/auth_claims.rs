//! Signed session token claims.

use std::time::Duration;

use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::Account;
use uniteam_postgres::types::AccountRole;
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// Purpose of a token.
///
/// Access tokens authenticate API calls, refresh tokens can only be exchanged
/// for a new pair at `/auth/refresh/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by access and refresh tokens.
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer |
/// | `aud` | `audience` | Intended audience |
/// | `jti` | `token_id` | Unique token identifier |
/// | `sub` | `account_id` | Account the token represents |
/// | `iat` | `issued_at` | Seconds since the epoch |
/// | `exp` | `expires_at` | Seconds since the epoch |
/// | `role` | `account_role` | Role at issuance |
/// | `typ` | `token_kind` | Access or refresh |
///
/// The role claim is informational; [`AuthState`] reloads the account and
/// trusts the stored role.
///
/// [`AuthState`]: crate::extract::AuthState
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    #[serde(rename = "jti")]
    pub token_id: Uuid,
    #[serde(rename = "sub")]
    pub account_id: Uuid,

    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,

    #[serde(rename = "role")]
    pub account_role: AccountRole,
    #[serde(rename = "typ")]
    pub token_kind: TokenKind,
}

impl AuthClaims {
    const JWT_AUDIENCE: &str = "uniteam:server";
    const JWT_ISSUER: &str = "uniteam";

    /// Creates claims for `account` valid for `lifetime` from now.
    pub fn new(account: &Account, token_kind: TokenKind, lifetime: Duration) -> Self {
        let issued_at = jiff::Timestamp::now().as_second();
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);

        Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            account_id: account.id,
            issued_at,
            expires_at: issued_at.saturating_add(lifetime),
            account_role: account.account_role,
            token_kind,
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= jiff::Timestamp::now().as_second()
    }

    /// Seconds until expiry, zero once expired.
    pub fn remaining_seconds(&self) -> i64 {
        (self.expires_at - jiff::Timestamp::now().as_second()).max(0)
    }

    /// Signs the claims into a compact JWT.
    pub fn encode(&self, encoding_key: &EncodingKey) -> Result<String> {
        encode(&Header::new(Algorithm::EdDSA), self, encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %self.account_id,
                "Failed to sign session token"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })
    }

    /// Verifies `token` and checks that it is of the `expected` kind.
    pub fn decode(token: &str, decoding_key: &DecodingKey, expected: TokenKind) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp"]);

        let claims = decode::<Self>(token, decoding_key, &validation)?.claims;

        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                account_id = %claims.account_id,
                "Session token expired"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue")
                .with_resource("authentication"));
        }

        if claims.token_kind != expected {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                account_id = %claims.account_id,
                token_kind = ?claims.token_kind,
                expected = ?expected,
                "Session token used for the wrong purpose"
            );
            return Err(ErrorKind::MalformedAuthToken
                .with_message("Authentication token cannot be used here")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            account_id = %claims.account_id,
            remaining_seconds = claims.remaining_seconds(),
            "Session token verified"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is invalid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Authentication token uses an unsupported algorithm"),
            JwtErrorKind::InvalidAudience | JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Authentication token was not issued for this service"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("Token is missing required claim: {claim}")),
            JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) | JwtErrorKind::Utf8(_) => {
                ErrorKind::MalformedAuthToken.with_message("Authentication token is corrupted")
            }
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::test_state;

    fn account(role: AccountRole) -> Account {
        let now = jiff::Timestamp::now();
        Account {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            email_address: "ada@uni.example".to_owned(),
            password_hash: String::new(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: None,
            account_role: role,
            is_approved: true,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn round_trips_access_tokens() -> anyhow::Result<()> {
        let keys = test_state().session_keys;
        let claims = AuthClaims::new(&account(AccountRole::Lecturer), TokenKind::Access, Duration::from_secs(60));

        let token = claims.encode(keys.encoding_key())?;
        let decoded = AuthClaims::decode(&token, keys.decoding_key(), TokenKind::Access)?;

        assert_eq!(decoded, claims);
        assert_eq!(decoded.account_role, AccountRole::Lecturer);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_tokens_are_not_access_tokens() -> anyhow::Result<()> {
        let keys = test_state().session_keys;
        let claims = AuthClaims::new(&account(AccountRole::Student), TokenKind::Refresh, Duration::from_secs(60));
        let token = claims.encode(keys.encoding_key())?;

        let error = AuthClaims::decode(&token, keys.decoding_key(), TokenKind::Access).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::MalformedAuthToken));
        Ok(())
    }

    #[tokio::test]
    async fn expired_tokens_are_unauthorized() -> anyhow::Result<()> {
        let keys = test_state().session_keys;
        let mut claims = AuthClaims::new(&account(AccountRole::Student), TokenKind::Access, Duration::from_secs(60));
        claims.issued_at -= 7200;
        claims.expires_at -= 3600;
        let token = claims.encode(keys.encoding_key())?;

        let error = AuthClaims::decode(&token, keys.decoding_key(), TokenKind::Access).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Unauthorized));
        Ok(())
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = crate::service::test_keys();
        let error = AuthClaims::decode("not.a.jwt", keys.decoding_key(), TokenKind::Access).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::MalformedAuthToken));
    }
}
