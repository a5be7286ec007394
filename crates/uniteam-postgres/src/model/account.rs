//! Account model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;
use crate::types::{AccessScope, AccountCapabilities, AccountRole};

/// An identity that can authenticate against the API.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique, lowercase email address; also accepted as a login name.
    pub email_address: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// System-wide role.
    pub account_role: AccountRole,
    /// Lecturer approval gate; always true for other roles on creation.
    pub is_approved: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating an account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    pub username: String,
    pub email_address: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub account_role: AccountRole,
    pub is_approved: bool,
}

/// Partial account update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    pub username: Option<String>,
    pub email_address: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub account_role: Option<AccountRole>,
    pub is_approved: Option<bool>,
    pub last_login_at: Option<Timestamp>,
}

impl Account {
    /// Returns whether the account may authenticate.
    ///
    /// Unapproved lecturers are locked out.
    #[inline]
    pub fn can_login(&self) -> bool {
        self.is_approved || !self.account_role.requires_approval()
    }

    #[inline]
    pub fn capabilities(&self) -> AccountCapabilities {
        self.account_role.capabilities()
    }

    /// Visibility scope for list queries issued by this account.
    #[inline]
    pub fn access_scope(&self) -> AccessScope {
        AccessScope::for_account(self.id, self.account_role)
    }

    /// First and last name, falling back to the username.
    pub fn full_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        match full_name.trim() {
            "" => self.username.clone(),
            name => name.to_owned(),
        }
    }
}

impl NewAccount {
    /// Creates account data with the approval default of `role`.
    pub fn new(
        username: impl Into<String>,
        email_address: impl Into<String>,
        password_hash: impl Into<String>,
        account_role: AccountRole,
    ) -> Self {
        Self {
            username: username.into().trim().to_owned(),
            email_address: email_address.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
            account_role,
            is_approved: account_role.default_approval(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into().trim().to_owned();
        self.last_name = last_name.into().trim().to_owned();
        self
    }

    pub fn with_phone_number(mut self, phone_number: Option<String>) -> Self {
        self.phone_number = phone_number.filter(|phone| !phone.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: AccountRole, is_approved: bool) -> Account {
        let now = Timestamp::from(jiff::Timestamp::UNIX_EPOCH);
        Account {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email_address: "ada@uni.example".into(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            account_role: role,
            is_approved,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unapproved_lecturer_cannot_login() {
        assert!(!account(AccountRole::Lecturer, false).can_login());
        assert!(account(AccountRole::Lecturer, true).can_login());
        assert!(account(AccountRole::Student, false).can_login());
    }

    #[test]
    fn new_account_defaults() {
        let lecturer = NewAccount::new(" grace ", "Grace@Uni.Example", "hash", AccountRole::Lecturer);
        assert_eq!(lecturer.username, "grace");
        assert_eq!(lecturer.email_address, "grace@uni.example");
        assert!(!lecturer.is_approved);

        let student = NewAccount::new("alan", "alan@uni.example", "hash", AccountRole::Student)
            .with_phone_number(Some("  ".into()));
        assert!(student.is_approved);
        assert_eq!(student.phone_number, None);
    }

    #[test]
    fn full_name_falls_back_to_username() {
        let mut ada = account(AccountRole::Student, true);
        assert_eq!(ada.full_name(), "ada");

        ada.first_name = "Ada".into();
        ada.last_name = "Lovelace".into();
        assert_eq!(ada.full_name(), "Ada Lovelace");
    }
}
