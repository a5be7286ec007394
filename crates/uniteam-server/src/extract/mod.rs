//! Request extractors with rejections rendered as [`Error`] responses.
//!
//! - [`AuthState`] verifies the bearer token and re-reads the account.
//! - [`PgPool`] checks a connection out of the pool.
//! - [`Json`], [`Path`], [`Query`] and [`ValidateJson`] replace the axum
//!   extractors of the same name.
//!
//! [`Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

mod pg_pool;

pub use crate::extract::auth::{
    AuthClaims, AuthContext, AuthHeader, AuthProvider, AuthResult, AuthState, Permission,
    TokenKind,
};
pub use crate::extract::pg_pool::PgPool;
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
pub use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION};
