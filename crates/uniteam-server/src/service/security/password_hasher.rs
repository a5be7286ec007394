//! Argon2id password hashing.
//!
//! Failures are reported as handler errors since every caller is a request
//! handler: a wrong password is `unauthorized`, anything else is internal.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;

use crate::handler::{ErrorKind, Result};

const TRACING_TARGET: &str = "uniteam_server::service::password_hasher";

/// Hashes passwords into PHC strings and verifies them.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Salt generation failed");
            ErrorKind::InternalServerError
                .with_message("Password processing failed")
                .with_resource("authentication")
        })?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET, error = %e, "Password hashing failed");
                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_resource("authentication")
            })?;

        Ok(hash.to_string())
    }

    /// Checks `password` against a stored PHC string.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Stored hash is malformed");
            ErrorKind::InternalServerError
                .with_message("Authentication is temporarily unavailable")
                .with_resource("authentication")
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => Err(ErrorKind::Unauthorized
                .with_message("Invalid username or password")
                .with_resource("authentication")),
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "Password verification failed");
                Err(ErrorKind::InternalServerError
                    .with_message("Authentication is temporarily unavailable")
                    .with_resource("authentication"))
            }
        }
    }

    /// Spends the time of a real verification against a random hash.
    ///
    /// Called when the login name matches no account so that response time
    /// does not reveal which usernames exist. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::Rng;

        let length = rand::random_range(16..32);
        let dummy: String = (0..length)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct horse battery staple")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse battery staple", &hash).is_ok());
        Ok(())
    }

    #[test]
    fn salts_differ() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let first = hasher.hash_password("same password")?;
        let second = hasher.hash_password("same password")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("right password")?;

        let error = hasher.verify_password("wrong password", &hash).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Unauthorized));
        Ok(())
    }

    #[test]
    fn malformed_hash_is_internal() {
        let hasher = PasswordHasher::new();
        let error = hasher.verify_password("password", "not-a-phc-string").err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::InternalServerError));
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        assert!(!PasswordHasher::new().verify_dummy_password("anything"));
    }
}
