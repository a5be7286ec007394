//! Role-matched profile models.
//!
//! Every account owns exactly one profile, stored in the table matching its
//! role. [`NewProfile::for_role`] is the single factory used when an account
//! is created or its role changes.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{admin_profiles, lecturer_profiles, student_profiles};
use crate::types::AccountRole;

/// Default title given to new administrator profiles.
pub const DEFAULT_ADMIN_ROLE_TITLE: &str = "System Administrator";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = student_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentProfile {
    pub account_id: Uuid,
    pub personal_email: String,
    pub university: String,
    pub department: String,
    pub course_name: String,
    /// Between 1 and 10 when set.
    pub year_of_study: Option<i32>,
    pub skills: Vec<String>,
    pub bio: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = lecturer_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LecturerProfile {
    pub account_id: Uuid,
    pub department: String,
    pub courses_taught: Vec<String>,
    pub office_location: String,
    pub research_areas: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = admin_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminProfile {
    pub account_id: Uuid,
    pub role_title: String,
    pub responsibilities: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The profile of an account, whichever table it lives in.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Student(StudentProfile),
    Lecturer(LecturerProfile),
    Admin(AdminProfile),
}

impl Profile {
    /// Role this profile belongs to.
    pub fn role(&self) -> AccountRole {
        match self {
            Profile::Student(_) => AccountRole::Student,
            Profile::Lecturer(_) => AccountRole::Lecturer,
            Profile::Admin(_) => AccountRole::Admin,
        }
    }

    pub fn account_id(&self) -> Uuid {
        match self {
            Profile::Student(profile) => profile.account_id,
            Profile::Lecturer(profile) => profile.account_id,
            Profile::Admin(profile) => profile.account_id,
        }
    }
}

#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = student_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewStudentProfile {
    pub account_id: Uuid,
}

#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = lecturer_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewLecturerProfile {
    pub account_id: Uuid,
}

#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = admin_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAdminProfile {
    pub account_id: Uuid,
    pub role_title: String,
}

/// An empty profile row for a freshly created account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProfile {
    Student(Uuid),
    Lecturer(Uuid),
    Admin(Uuid),
}

impl NewProfile {
    /// Selects the profile table matching `role`.
    pub fn for_role(account_id: Uuid, role: AccountRole) -> Self {
        match role {
            AccountRole::Student => NewProfile::Student(account_id),
            AccountRole::Lecturer => NewProfile::Lecturer(account_id),
            AccountRole::Admin => NewProfile::Admin(account_id),
        }
    }

    pub fn role(&self) -> AccountRole {
        match self {
            NewProfile::Student(_) => AccountRole::Student,
            NewProfile::Lecturer(_) => AccountRole::Lecturer,
            NewProfile::Admin(_) => AccountRole::Admin,
        }
    }
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = student_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateStudentProfile {
    pub personal_email: Option<String>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub course_name: Option<String>,
    pub year_of_study: Option<Option<i32>>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = lecturer_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateLecturerProfile {
    pub department: Option<String>,
    pub courses_taught: Option<Vec<String>>,
    pub office_location: Option<String>,
    pub research_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = admin_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAdminProfile {
    pub role_title: Option<String>,
    pub responsibilities: Option<String>,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn factory_matches_every_role() {
        let account_id = Uuid::new_v4();
        for role in AccountRole::iter() {
            let profile = NewProfile::for_role(account_id, role);
            assert_eq!(profile.role(), role);
        }
    }
}
