//! Startup routine that guarantees an administrator account exists.

use uniteam_postgres::PgError;
use uniteam_postgres::model::{Account, NewAccount, NewProfile, Profile};
use uniteam_postgres::query::{AccountRepository, ProfileRepository};
use uniteam_postgres::types::AccountRole;

use crate::service::ServiceState;
use crate::{Error, Result};

const TRACING_TARGET: &str = "uniteam_server::service::bootstrap";

/// Creates the configured administrator unless an admin already exists.
///
/// Fails when the username or email is held by a non-admin account, since
/// silently promoting an existing account would grant it full access.
pub async fn ensure_admin_account(
    state: &ServiceState,
    (username, email_address, password): (&str, &str, &str),
) -> Result<()> {
    let mut conn = state.postgres.get_connection().await?;

    if conn.admin_exists().await? {
        tracing::debug!(target: TRACING_TARGET, "Administrator account present");
        return Ok(());
    }

    if conn.username_exists(username, None).await? || conn.email_exists(email_address, None).await? {
        return Err(Error::config(
            "ADMIN_USERNAME or ADMIN_EMAIL belongs to an existing non-admin account",
        ));
    }

    let password_hash = state
        .password_hasher
        .hash_password(password)
        .map_err(|e| Error::auth("administrator password could not be hashed").with_source(e))?;

    let new_account = NewAccount::new(username, email_address, password_hash, AccountRole::Admin)
        .with_name("System", "Administrator");

    let (account, _profile) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let account = conn.create_account(new_account).await?;
                let new_profile = NewProfile::for_role(account.id, account.account_role);
                let profile = conn.create_profile(new_profile).await?;
                Ok::<(Account, Profile), PgError>((account, profile))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        username = %account.username,
        "Administrator account created",
    );

    Ok(())
}
