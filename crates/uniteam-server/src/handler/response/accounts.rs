//! Account response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model;
use uniteam_postgres::types::AccountRole;
use uuid::Uuid;

use super::Profile;

/// Represents an account. The password hash never leaves the server.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier of the account.
    pub account_id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address, also accepted as a login name.
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    /// First and last name, or the username when both are empty.
    pub full_name: String,
    pub phone_number: Option<String>,
    /// System-wide role.
    pub account_role: AccountRole,
    /// Whether the account passed lecturer approval.
    pub is_approved: bool,
    /// Timestamp of the last successful login.
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    pub fn from_model(account: model::Account) -> Self {
        let full_name = account.full_name();
        Self {
            account_id: account.id,
            username: account.username,
            email_address: account.email_address,
            first_name: account.first_name,
            last_name: account.last_name,
            full_name,
            phone_number: account.phone_number,
            account_role: account.account_role,
            is_approved: account.is_approved,
            last_login_at: account.last_login_at.map(Into::into),
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}

/// List of accounts.
pub type Accounts = Vec<Account>;

/// An account together with its role-matched profile.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountWithProfile {
    #[serde(flatten)]
    pub account: Account,
    /// Missing only while a role change is being applied.
    pub profile: Option<Profile>,
}

impl AccountWithProfile {
    pub fn from_model(account: model::Account, profile: Option<model::Profile>) -> Self {
        Self {
            account: Account::from_model(account),
            profile: profile.map(Profile::from_model),
        }
    }
}

/// Short form of an account embedded in other responses.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email_address: String,
    pub account_role: AccountRole,
}

impl AccountSummary {
    pub fn from_model(account: &model::Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
            full_name: account.full_name(),
            email_address: account.email_address.clone(),
            account_role: account.account_role,
        }
    }
}

/// List of account summaries, as returned by the student search.
pub type AccountSummaries = Vec<AccountSummary>;
