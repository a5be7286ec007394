//! Token handling, the authenticated caller and permission checks.

mod auth_claims;
mod auth_header;
mod auth_provider;
mod auth_state;
mod permission;

pub use self::auth_claims::{AuthClaims, TokenKind};
pub use self::auth_header::AuthHeader;
pub use self::auth_provider::AuthProvider;
pub use self::auth_state::{AuthContext, AuthState};
pub use self::permission::{AuthResult, Permission};
