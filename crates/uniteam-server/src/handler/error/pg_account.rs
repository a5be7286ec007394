//! Account and profile constraint violations.

use uniteam_postgres::types::{AccountConstraints, ProfileConstraints};

use crate::handler::{Error, ErrorKind};

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::UsernameLength => ErrorKind::BadRequest
                .with_message("Username must be between 3 and 150 characters long"),
            AccountConstraints::UsernameFormat => ErrorKind::BadRequest
                .with_message("Username may only contain letters, digits and @.+-_"),
            AccountConstraints::EmailAddressFormat => {
                ErrorKind::BadRequest.with_message("Invalid email address format")
            }
            AccountConstraints::EmailAddressLowercase => {
                ErrorKind::BadRequest.with_message("Email address must be lowercase")
            }
            AccountConstraints::NameLength => {
                ErrorKind::BadRequest.with_message("First and last name are too long")
            }
            AccountConstraints::PhoneNumberLength => {
                ErrorKind::BadRequest.with_message("Phone number is too long")
            }
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            AccountConstraints::UsernameUnique => ErrorKind::Conflict
                .with_message("An account with this username already exists"),
            AccountConstraints::EmailAddressUnique => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
        };

        error.with_resource("account")
    }
}

impl From<ProfileConstraints> for Error<'static> {
    fn from(c: ProfileConstraints) -> Self {
        let error = match c {
            ProfileConstraints::StudentYearOfStudyRange => {
                ErrorKind::BadRequest.with_message("Year of study must be between 1 and 10")
            }
            ProfileConstraints::StudentBioLength => {
                ErrorKind::BadRequest.with_message("Bio is too long")
            }
            ProfileConstraints::StudentSkillsSize => {
                ErrorKind::BadRequest.with_message("Too many skills listed")
            }
            ProfileConstraints::LecturerOfficeLocationLength => {
                ErrorKind::BadRequest.with_message("Office location is too long")
            }
            ProfileConstraints::LecturerTagsSize => ErrorKind::BadRequest
                .with_message("Too many courses taught or research areas listed"),
            ProfileConstraints::AdminRoleTitleLength => {
                ErrorKind::BadRequest.with_message("Role title is too long")
            }
        };

        error.with_resource("profile")
    }
}
