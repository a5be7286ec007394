//! Handler error type and its kinds.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::{ErrorResponse, ValidationErrorDetail};

/// Error returned by every handler and extractor.
///
/// Built from an [`ErrorKind`] and refined with a message, the resource it
/// concerns, a suggestion for the client and internal context:
///
/// ```
/// use uniteam_server::handler::ErrorKind;
///
/// let error = ErrorKind::Conflict
///     .with_message("The team must keep at least one leader")
///     .with_resource("team_member")
///     .with_suggestion("Promote another member to leader first");
/// assert_eq!(error.resource(), Some("team_member"));
/// ```
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    suggestion: Option<Cow<'a, str>>,
    validation: Option<Vec<ValidationErrorDetail>>,
}

impl Error<'static> {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            resource: None,
            suggestion: None,
            validation: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches internal context. Logged, never sent to the client.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    #[inline]
    pub fn with_suggestion(self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
            ..self
        }
    }

    #[inline]
    pub fn with_validation(self, validation: Vec<ValidationErrorDetail>) -> Self {
        Self {
            validation: Some(validation),
            ..self
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    #[inline]
    pub fn validation(&self) -> Option<&[ValidationErrorDetail]> {
        self.validation.as_deref()
    }

    /// Detaches the error from any borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
            suggestion: self.suggestion.map(|s| Cow::Owned(s.into_owned())),
            validation: self.validation,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("status", &self.kind.status_code())
            .field("message", &self.message)
            .field("resource", &self.resource)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(response.message.as_ref());
        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }

        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {resource}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if let Some(message) = self.message {
            response = response.with_message(message);
        }

        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }

        if let Some(suggestion) = self.suggestion {
            response = response.with_suggestion(suggestion);
        }

        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        if let Some(validation) = self.validation {
            response = response.with_validation_errors(validation);
        }

        response.into_response()
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse<'static>;
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// [`Result`] with [`Error`] as the default error.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Category of a handler [`Error`], fixing its status code and name.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400, a required path parameter is missing.
    MissingPathParam,
    /// 400, the request is malformed or breaks a validation rule.
    BadRequest,
    /// 401, no bearer token was sent.
    MissingAuthToken,
    /// 401, the bearer token cannot be decoded.
    MalformedAuthToken,
    /// 401, credentials are wrong, expired or no longer valid.
    Unauthorized,
    /// 403, the caller lacks the required role or membership.
    Forbidden,
    /// 404
    NotFound,
    /// 409, the request contradicts the current state.
    Conflict,
    /// 500
    #[default]
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the response template of this kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingPathParam => ErrorResponse::MISSING_PATH_PARAM,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::MissingAuthToken => ErrorResponse::MISSING_AUTH_TOKEN,
            Self::MalformedAuthToken => ErrorResponse::MALFORMED_AUTH_TOKEN,
            Self::Unauthorized => ErrorResponse::UNAUTHORIZED,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Conflict => ErrorResponse::CONFLICT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_internal() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("Project not found")
            .with_resource("project")
            .with_context("id 42")
            .with_suggestion("Check the project id");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Project not found"));
        assert_eq!(error.resource(), Some("project"));
        assert_eq!(error.context(), Some("id 42"));
        assert_eq!(error.suggestion(), Some("Check the project id"));
    }

    #[test]
    fn display_includes_name_and_status() {
        let error = ErrorKind::Forbidden
            .with_message("Only team leaders may do this")
            .with_resource("project");

        let display = error.to_string();
        assert!(display.contains("forbidden"));
        assert!(display.contains("403"));
        assert!(display.contains("Only team leaders may do this"));
        assert!(display.contains("project"));
    }

    #[test]
    fn into_static_keeps_fields() {
        let resource = String::from("invitation");
        let error = ErrorKind::Conflict
            .with_resource(resource.as_str())
            .with_message("Already accepted");
        let error = error.into_static();
        drop(resource);

        assert_eq!(error.resource(), Some("invitation"));
        assert_eq!(error.message(), Some("Already accepted"));
    }

    #[test]
    fn kinds_map_to_statuses() {
        let expected = [
            (ErrorKind::MissingPathParam, StatusCode::BAD_REQUEST),
            (ErrorKind::BadRequest, StatusCode::BAD_REQUEST),
            (ErrorKind::MissingAuthToken, StatusCode::UNAUTHORIZED),
            (ErrorKind::MalformedAuthToken, StatusCode::UNAUTHORIZED),
            (ErrorKind::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorKind::Forbidden, StatusCode::FORBIDDEN),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::Conflict, StatusCode::CONFLICT),
            (ErrorKind::InternalServerError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, status) in expected {
            assert_eq!(kind.status_code(), status, "{kind:?}");
            assert_eq!(kind.into_response().status(), status);
        }
    }
}
