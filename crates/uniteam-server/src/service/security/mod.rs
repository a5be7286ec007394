//! Password hashing, password strength and session key services.

mod password_hasher;
mod password_strength;
mod session_keys;

pub use password_hasher::PasswordHasher;
pub use password_strength::PasswordStrength;
pub use session_keys::{SessionKeys, SessionKeysConfig};

#[cfg(test)]
pub(crate) use session_keys::tests::test_keys;
