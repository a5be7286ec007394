//! Password strength checks backed by zxcvbn.

use zxcvbn::zxcvbn;

use crate::handler::{ErrorKind, Result};

const TRACING_TARGET: &str = "uniteam_server::service::password_strength";

/// Rejects passwords whose zxcvbn score is below a threshold.
#[derive(Debug, Clone, Copy)]
pub struct PasswordStrength {
    min_score: u8,
}

impl PasswordStrength {
    /// Default threshold on the 0..=4 zxcvbn scale.
    pub const DEFAULT_MIN_SCORE: u8 = 3;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn with_min_score(min_score: u8) -> Self {
        Self { min_score }
    }

    /// Returns the zxcvbn score of `password`, penalizing the `user_inputs`
    /// (username, email, names) when they appear in it.
    pub fn score(&self, password: &str, user_inputs: &[&str]) -> u8 {
        zxcvbn(password, user_inputs).score().into()
    }

    /// Fails with `bad_request` and zxcvbn's suggestions when the password is
    /// too weak.
    pub fn validate_password(&self, password: &str, user_inputs: &[&str]) -> Result<()> {
        let entropy = zxcvbn(password, user_inputs);
        let score: u8 = entropy.score().into();
        if score >= self.min_score {
            return Ok(());
        }

        tracing::debug!(
            target: TRACING_TARGET,
            score,
            min_score = self.min_score,
            "Password rejected as too weak"
        );

        let mut error = ErrorKind::BadRequest
            .with_message("Password is too weak")
            .with_resource("password");

        if let Some(feedback) = entropy.feedback() {
            if let Some(warning) = feedback.warning() {
                error = error.with_context(warning.to_string());
            }

            let suggestions = feedback
                .suggestions()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            if !suggestions.is_empty() {
                error = error.with_suggestion(suggestions.join(" "));
            }
        }

        Err(error)
    }
}

impl Default for PasswordStrength {
    #[inline]
    fn default() -> Self {
        Self::with_min_score(Self::DEFAULT_MIN_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weak_passwords() {
        let checker = PasswordStrength::new();
        let error = checker.validate_password("password", &[]).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::BadRequest));
    }

    #[test]
    fn accepts_strong_passwords() {
        let checker = PasswordStrength::new();
        assert!(checker.validate_password("Tr0ub4dor&3-horse-Staple!92", &[]).is_ok());
    }

    #[test]
    fn penalizes_user_inputs() {
        let checker = PasswordStrength::new();
        let with_inputs = checker.score("ada.lovelace1815", &["ada", "lovelace", "1815"]);
        let without = checker.score("ada.lovelace1815", &[]);
        assert!(with_inputs <= without);
    }

    #[test]
    fn threshold_zero_accepts_everything() {
        let checker = PasswordStrength::with_min_score(0);
        assert!(checker.validate_password("a", &[]).is_ok());
    }
}
