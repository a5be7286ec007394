//! Errors raised while building and running the service layer.
//!
//! Handlers report failures through [`handler::Error`]; this type covers
//! startup and security plumbing such as loading keys, hashing passwords and
//! bootstrapping the administrator account.
//!
//! [`handler::Error`]: crate::handler::Error

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use uniteam_postgres::PgError;

/// Boxed error source, `Send + Sync` so it can cross task boundaries.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad category of a service layer [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or inconsistent configuration.
    Config,
    /// A backing service (the database) failed.
    External,
    /// Key material, tokens or password hashes could not be processed.
    Auth,
    /// Reading from the file system failed.
    FileSystem,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::External => "external_service",
            Self::Auth => "auth",
            Self::FileSystem => "file_system",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with a kind, a message and an optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates an error for a failing backing service, prefixed with its name.
    #[inline]
    pub fn external(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::External, message)
    }

    #[inline]
    pub fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    #[inline]
    pub fn file_system(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::FileSystem, message)
    }

    /// Creates an internal error attributed to `service`.
    #[inline]
    pub fn internal(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<PgError> for Error {
    fn from(err: PgError) -> Self {
        match err {
            PgError::Config(ref message) => Error::config(message.clone()).with_source(err),
            other => Error::external("postgres", other.to_string()).with_source(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_config_error() {
        let error = Error::config("PORT must be at least 1024");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "PORT must be at least 1024");
        assert_eq!(error.to_string(), "config error: PORT must be at least 1024");
    }

    #[test]
    fn keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = Error::file_system("cannot read private key").with_source(source);
        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::FileSystem);
    }

    #[test]
    fn maps_database_errors() {
        let error = Error::from(PgError::Config("postgres_url cannot be empty".into()));
        assert_eq!(error.kind(), ErrorKind::Config);

        let error = Error::from(PgError::Unexpected("pool closed".into()));
        assert_eq!(error.kind(), ErrorKind::External);
        assert!(error.message().starts_with("postgres: "));
    }
}
