//! Authentication response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Account, Profile};

/// Token pair issued on login, registration and refresh.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived token sent as `Authorization: Bearer …`.
    pub access_token: String,
    /// Long-lived token accepted only by the refresh endpoint.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    /// ID of the authenticated account.
    pub account_id: Uuid,
    /// Timestamp when the access token expires.
    pub expires_at: Timestamp,
}

/// Outcome of a registration.
///
/// `tokens` is absent for lecturers, who must be approved before they can
/// log in.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub account: Account,
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<AuthTokens>,
}
