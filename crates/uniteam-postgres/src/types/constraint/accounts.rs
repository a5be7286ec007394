//! Accounts table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Accounts table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_username_length")]
    UsernameLength,
    #[strum(serialize = "accounts_username_format")]
    UsernameFormat,
    #[strum(serialize = "accounts_email_address_format")]
    EmailAddressFormat,
    #[strum(serialize = "accounts_email_address_lowercase")]
    EmailAddressLowercase,
    #[strum(serialize = "accounts_name_length")]
    NameLength,
    #[strum(serialize = "accounts_phone_number_length")]
    PhoneNumberLength,
    #[strum(serialize = "accounts_updated_after_created")]
    UpdatedAfterCreated,
    #[strum(serialize = "accounts_username_unique_idx")]
    UsernameUnique,
    #[strum(serialize = "accounts_email_address_unique_idx")]
    EmailAddressUnique,
}

impl AccountConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountConstraints::UsernameLength
            | AccountConstraints::UsernameFormat
            | AccountConstraints::EmailAddressFormat
            | AccountConstraints::EmailAddressLowercase
            | AccountConstraints::NameLength
            | AccountConstraints::PhoneNumberLength => ConstraintCategory::Validation,
            AccountConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
            AccountConstraints::UsernameUnique
            | AccountConstraints::EmailAddressUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
