//! Account management request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{NewAccount, UpdateAccount as UpdateAccountModel};
use uniteam_postgres::types::AccountRole;
use uuid::Uuid;
use validator::Validate;

use super::validations::{Normalized, double_option};

/// Request payload for an administrator creating an account of any role.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email_address: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,

    #[validate(length(max = 32))]
    pub phone_number: Option<String>,

    pub account_role: AccountRole,

    /// Overrides the role's default approval state.
    pub is_approved: Option<bool>,
}

impl CreateAccount {
    pub fn into_model(self, password_hash: String) -> NewAccount {
        let mut new_account =
            NewAccount::new(self.username, self.email_address, password_hash, self.account_role)
                .with_name(self.first_name, self.last_name)
                .with_phone_number(self.phone_number.normalized());
        if let Some(is_approved) = self.is_approved {
            new_account.is_approved = is_approved;
        }
        new_account
    }
}

/// Request payload for updating an account. Absent fields are unchanged.
///
/// Changing `accountRole` replaces the role-specific profile.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    #[validate(length(min = 3, max = 150))]
    pub username: Option<String>,

    #[validate(email, length(max = 254))]
    pub email_address: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    /// `null` clears the phone number.
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,

    pub account_role: Option<AccountRole>,

    pub is_approved: Option<bool>,
}

impl UpdateAccount {
    pub fn into_model(self, password_hash: Option<String>) -> UpdateAccountModel {
        UpdateAccountModel {
            username: self.username.normalized(),
            email_address: self.email_address.map(|email| email.trim().to_lowercase()),
            password_hash,
            first_name: self.first_name.normalized(),
            last_name: self.last_name.normalized(),
            phone_number: self
                .phone_number
                .map(|phone| phone.normalized().filter(|phone| !phone.is_empty())),
            account_role: self.account_role,
            is_approved: self.is_approved,
            last_login_at: None,
        }
    }
}

/// Optional role filter for the account list.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    pub role: Option<AccountRole>,
}

/// Filter for the student picker used when inviting members.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSearch {
    /// Matched against username, first name, last name and email.
    pub search: Option<String>,
    /// Leaves out students already on this project's team.
    pub exclude_project_id: Option<Uuid>,
}

impl StudentSearch {
    /// The trimmed search term, `None` when blank.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_normalizes_contact_fields() -> anyhow::Result<()> {
        let request: UpdateAccount = serde_json::from_str(
            r#"{"emailAddress":" Grace@Navy.MIL ","phoneNumber":"   ","accountRole":"LECTURER"}"#,
        )?;
        let model = request.into_model(None);

        assert_eq!(model.email_address.as_deref(), Some("grace@navy.mil"));
        assert_eq!(model.phone_number, Some(None));
        assert_eq!(model.account_role, Some(AccountRole::Lecturer));
        assert_eq!(model.username, None);
        Ok(())
    }

    #[test]
    fn admin_may_preapprove_lecturers() {
        let request = CreateAccount {
            username: "turing".to_owned(),
            email_address: "turing@uni.example".to_owned(),
            password: "enigma-machine-1939".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            account_role: AccountRole::Lecturer,
            is_approved: Some(true),
        };
        assert!(request.into_model("hash".to_owned()).is_approved);
    }

    #[test]
    fn blank_search_is_no_search() {
        let search = StudentSearch {
            search: Some("  ".to_owned()),
            exclude_project_id: None,
        };
        assert_eq!(search.term(), None);
    }
}
