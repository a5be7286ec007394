//! Profile repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{
    AdminProfile, DEFAULT_ADMIN_ROLE_TITLE, LecturerProfile, NewAdminProfile, NewLecturerProfile, NewProfile,
    NewStudentProfile, Profile, StudentProfile, UpdateAdminProfile, UpdateLecturerProfile,
    UpdateStudentProfile,
};
use crate::types::AccountRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Role-matched profile storage.
pub trait ProfileRepository {
    /// Inserts the empty profile row selected by [`NewProfile::for_role`].
    fn create_profile(
        &mut self,
        new_profile: NewProfile,
    ) -> impl Future<Output = PgResult<Profile>> + Send;

    /// Loads the profile of `account_id` from the table matching `role`.
    fn find_profile(
        &mut self,
        account_id: Uuid,
        role: AccountRole,
    ) -> impl Future<Output = PgResult<Option<Profile>>> + Send;

    fn update_student_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateStudentProfile,
    ) -> impl Future<Output = PgResult<StudentProfile>> + Send;

    fn update_lecturer_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateLecturerProfile,
    ) -> impl Future<Output = PgResult<LecturerProfile>> + Send;

    fn update_admin_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateAdminProfile,
    ) -> impl Future<Output = PgResult<AdminProfile>> + Send;

    /// Deletes whichever profile rows `account_id` has.
    ///
    /// Used when an account changes role, right before creating the new one.
    fn delete_profiles(&mut self, account_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl ProfileRepository for PgConnection {
    async fn create_profile(&mut self, new_profile: NewProfile) -> PgResult<Profile> {
        use schema::{admin_profiles, lecturer_profiles, student_profiles};

        let profile = match new_profile {
            NewProfile::Student(account_id) => {
                let profile = diesel::insert_into(student_profiles::table)
                    .values(&NewStudentProfile { account_id })
                    .returning(StudentProfile::as_returning())
                    .get_result(self)
                    .await?;
                Profile::Student(profile)
            }
            NewProfile::Lecturer(account_id) => {
                let profile = diesel::insert_into(lecturer_profiles::table)
                    .values(&NewLecturerProfile { account_id })
                    .returning(LecturerProfile::as_returning())
                    .get_result(self)
                    .await?;
                Profile::Lecturer(profile)
            }
            NewProfile::Admin(account_id) => {
                let new_profile = NewAdminProfile {
                    account_id,
                    role_title: DEFAULT_ADMIN_ROLE_TITLE.to_owned(),
                };
                let profile = diesel::insert_into(admin_profiles::table)
                    .values(&new_profile)
                    .returning(AdminProfile::as_returning())
                    .get_result(self)
                    .await?;
                Profile::Admin(profile)
            }
        };

        Ok(profile)
    }

    async fn find_profile(
        &mut self,
        account_id: Uuid,
        role: AccountRole,
    ) -> PgResult<Option<Profile>> {
        use schema::{admin_profiles, lecturer_profiles, student_profiles};

        let profile = match role {
            AccountRole::Student => student_profiles::table
                .find(account_id)
                .select(StudentProfile::as_select())
                .first(self)
                .await
                .optional()?
                .map(Profile::Student),
            AccountRole::Lecturer => lecturer_profiles::table
                .find(account_id)
                .select(LecturerProfile::as_select())
                .first(self)
                .await
                .optional()?
                .map(Profile::Lecturer),
            AccountRole::Admin => admin_profiles::table
                .find(account_id)
                .select(AdminProfile::as_select())
                .first(self)
                .await
                .optional()?
                .map(Profile::Admin),
        };

        Ok(profile)
    }

    async fn update_student_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateStudentProfile,
    ) -> PgResult<StudentProfile> {
        use schema::student_profiles;

        diesel::update(student_profiles::table.find(account_id))
            .set((&updates, student_profiles::updated_at.eq(now)))
            .returning(StudentProfile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_lecturer_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateLecturerProfile,
    ) -> PgResult<LecturerProfile> {
        use schema::lecturer_profiles;

        diesel::update(lecturer_profiles::table.find(account_id))
            .set((&updates, lecturer_profiles::updated_at.eq(now)))
            .returning(LecturerProfile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_admin_profile(
        &mut self,
        account_id: Uuid,
        updates: UpdateAdminProfile,
    ) -> PgResult<AdminProfile> {
        use schema::admin_profiles;

        diesel::update(admin_profiles::table.find(account_id))
            .set((&updates, admin_profiles::updated_at.eq(now)))
            .returning(AdminProfile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_profiles(&mut self, account_id: Uuid) -> PgResult<()> {
        use schema::{admin_profiles, lecturer_profiles, student_profiles};

        diesel::delete(student_profiles::table.find(account_id))
            .execute(self)
            .await?;
        diesel::delete(lecturer_profiles::table.find(account_id))
            .execute(self)
            .await?;
        diesel::delete(admin_profiles::table.find(account_id))
            .execute(self)
            .await?;
        Ok(())
    }
}
