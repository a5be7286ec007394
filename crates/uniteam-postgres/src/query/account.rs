//! Account repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, contains_pattern};
use crate::model::{Account, NewAccount, UpdateAccount};
use crate::types::AccountRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Account lookups, listing and lifecycle.
pub trait AccountRepository {
    /// Inserts an account. Callers create its profile in the same transaction.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by exact username, falling back to a
    /// case-insensitive email match only when no username matches.
    fn find_account_by_login(
        &mut self,
        login: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    fn find_accounts_by_ids(
        &mut self,
        account_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Lists accounts, newest first, optionally restricted to one role.
    fn list_accounts(
        &mut self,
        role: Option<AccountRole>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Searches students by username, name or email.
    ///
    /// Members of `exclude_team_id` are left out, which is what the
    /// invitation picker needs.
    fn search_students(
        &mut self,
        search: Option<&str>,
        exclude_team_id: Option<Uuid>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    fn update_account(
        &mut self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Deletes an account row; profiles and memberships cascade.
    fn delete_account(&mut self, account_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    /// Stamps `last_login_at` with the current time.
    fn record_login(&mut self, account_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;

    /// Returns whether `username` is taken as a username or an email address.
    fn username_exists(
        &mut self,
        username: &str,
        exclude_account_id: Option<Uuid>,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Returns whether `email` is taken as an email address or a username.
    fn email_exists(
        &mut self,
        email: &str,
        exclude_account_id: Option<Uuid>,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Returns whether any administrator account exists.
    fn admin_exists(&mut self) -> impl Future<Output = PgResult<bool>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_login(&mut self, login: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        let login = login.trim();
        let by_username = accounts::table
            .filter(dsl::username.eq(login))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()?;
        if by_username.is_some() {
            return Ok(by_username);
        }

        accounts::table
            .filter(dsl::email_address.eq(login.to_lowercase()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_accounts_by_ids(&mut self, account_ids: &[Uuid]) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        accounts::table
            .filter(dsl::id.eq_any(account_ids))
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_accounts(
        &mut self,
        role: Option<AccountRole>,
        pagination: Pagination,
    ) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        let mut query = accounts::table.select(Account::as_select()).into_boxed();
        if let Some(role) = role {
            query = query.filter(dsl::account_role.eq(role));
        }

        query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn search_students(
        &mut self,
        search: Option<&str>,
        exclude_team_id: Option<Uuid>,
        pagination: Pagination,
    ) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};
        use schema::team_members;

        let mut query = accounts::table
            .filter(dsl::account_role.eq(AccountRole::Student))
            .select(Account::as_select())
            .into_boxed();

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = contains_pattern(search);
            query = query.filter(
                dsl::username
                    .ilike(pattern.clone())
                    .or(dsl::first_name.ilike(pattern.clone()))
                    .or(dsl::last_name.ilike(pattern.clone()))
                    .or(dsl::email_address.ilike(pattern)),
            );
        }

        if let Some(team_id) = exclude_team_id {
            let member_ids: Vec<Uuid> = team_members::table
                .filter(team_members::team_id.eq(team_id))
                .select(team_members::account_id)
                .load(self)
                .await?;
            query = query.filter(dsl::id.ne_all(member_ids));
        }

        query
            .order((dsl::last_name.asc(), dsl::first_name.asc(), dsl::username.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        mut updates: UpdateAccount,
    ) -> PgResult<Account> {
        use schema::accounts::{self, dsl};

        updates.email_address = updates.email_address.map(|e| e.trim().to_lowercase());
        updates.username = updates.username.map(|u| u.trim().to_owned());

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((&updates, dsl::updated_at.eq(now)))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_account(&mut self, account_id: Uuid) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let deleted = diesel::delete(accounts::table.filter(dsl::id.eq(account_id)))
            .execute(self)
            .await?;
        Ok(deleted > 0)
    }

    async fn record_login(&mut self, account_id: Uuid) -> PgResult<()> {
        use schema::accounts::{self, dsl};

        let logged_in_at = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set(dsl::last_login_at.eq(Some(logged_in_at)))
            .execute(self)
            .await?;
        Ok(())
    }

    async fn username_exists(
        &mut self,
        username: &str,
        exclude_account_id: Option<Uuid>,
    ) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let username = username.trim();
        let mut query = accounts::table
            .filter(
                dsl::username
                    .eq(username)
                    .or(dsl::email_address.eq(username.to_lowercase())),
            )
            .select(dsl::id)
            .into_boxed();
        if let Some(exclude) = exclude_account_id {
            query = query.filter(dsl::id.ne(exclude));
        }

        let found: Option<Uuid> = query.first(self).await.optional()?;
        Ok(found.is_some())
    }

    async fn email_exists(
        &mut self,
        email: &str,
        exclude_account_id: Option<Uuid>,
    ) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let email = email.trim();
        let mut query = accounts::table
            .filter(
                dsl::email_address
                    .eq(email.to_lowercase())
                    .or(dsl::username.eq(email)),
            )
            .select(dsl::id)
            .into_boxed();
        if let Some(exclude) = exclude_account_id {
            query = query.filter(dsl::id.ne(exclude));
        }

        let found: Option<Uuid> = query.first(self).await.optional()?;
        Ok(found.is_some())
    }

    async fn admin_exists(&mut self) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let found: Option<Uuid> = accounts::table
            .filter(dsl::account_role.eq(AccountRole::Admin))
            .select(dsl::id)
            .first(self)
            .await
            .optional()?;
        Ok(found.is_some())
    }
}
