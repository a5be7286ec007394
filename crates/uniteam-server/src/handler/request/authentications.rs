//! Authentication request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::NewAccount;
use uniteam_postgres::types::AccountRole;
use validator::Validate;

use super::validations::{Normalized, is_self_service_role};

/// Request payload for self-service registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Login name (3-150 characters).
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email_address: String,

    /// Password (8-128 characters); must also pass the strength check.
    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Repetition of `password`.
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,

    #[validate(length(max = 32))]
    pub phone_number: Option<String>,

    /// `STUDENT` or `LECTURER`. Lecturers wait for administrator approval.
    #[validate(custom(function = "is_self_service_role"))]
    pub account_role: AccountRole,
}

impl Register {
    /// Values used to penalize passwords that contain personal data.
    pub fn user_inputs(&self) -> [&str; 4] {
        [
            self.username.as_str(),
            self.email_address.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ]
    }

    pub fn into_model(self, password_hash: String) -> NewAccount {
        NewAccount::new(self.username, self.email_address, password_hash, self.account_role)
            .with_name(self.first_name, self.last_name)
            .with_phone_number(self.phone_number.normalized())
    }
}

/// Request payload for signing in with a username or an email address.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Username or email address.
    #[validate(length(min = 1, max = 254))]
    pub login: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Request payload for exchanging a refresh token.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSession {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    fn register(password_confirmation: &str, account_role: AccountRole) -> Register {
        Register {
            username: "ada".to_owned(),
            email_address: "Ada@Uni.Example".to_owned(),
            password: "analytical-engine-1843".to_owned(),
            password_confirmation: password_confirmation.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: Some("  ".to_owned()),
            account_role,
        }
    }

    #[test]
    fn confirmation_must_match() {
        assert!(register("analytical-engine-1843", AccountRole::Student).validate().is_ok());
        assert!(register("something else", AccountRole::Student).validate().is_err());
    }

    #[test]
    fn administrators_cannot_register() {
        assert!(register("analytical-engine-1843", AccountRole::Admin).validate().is_err());
    }

    #[test]
    fn lecturers_start_unapproved() {
        let model = register("analytical-engine-1843", AccountRole::Lecturer).into_model("hash".to_owned());
        assert!(!model.is_approved);
        assert_eq!(model.email_address, "ada@uni.example");
        assert_eq!(model.phone_number, None);
    }
}
