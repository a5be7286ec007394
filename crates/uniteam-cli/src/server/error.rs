//! Server error types.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Failure while configuring, binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the configured address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Returns a unique error code for this error type.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("Run with --help to see valid ranges for every option"),
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use. Try a different port or stop the conflicting service",
                ),
                io::ErrorKind::AddrNotAvailable => {
                    Some("The address is not available. Check network interface configuration")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let codes = [
            ServerError::InvalidConfig("port".to_owned()).error_code(),
            ServerError::BindError {
                address: "127.0.0.1:3000".to_owned(),
                source: io::Error::other("test"),
            }
            .error_code(),
            ServerError::Runtime(io::Error::other("test")).error_code(),
        ];

        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn bind_errors_suggest_a_fix() {
        let error = ServerError::BindError {
            address: "127.0.0.1:3000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };

        assert!(error.suggestion().is_some_and(|s| s.contains("already in use")));
        assert!(error.to_string().contains("127.0.0.1:3000"));
    }
}
