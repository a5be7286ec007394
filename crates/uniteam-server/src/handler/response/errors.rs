use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One broken validation rule on a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationErrorDetail {
    /// Name of the offending field.
    pub field: String,
    /// Rule that failed, such as `length` or `email`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// JSON body of every error the API returns.
///
/// Only `name`, `message`, `resource`, `suggestion` and `validation` reach
/// the client. The status selects the HTTP code and `context` is logged.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// Machine-readable error name, e.g. `not_found`.
    pub name: Cow<'a, str>,
    /// Message safe to show to the user.
    pub message: Cow<'a, str>,
    /// Resource the error concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// How the client may resolve the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Cow<'a, str>>,
    /// Per-field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationErrorDetail>>,

    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self =
        Self::new("conflict", "Resource state conflict.", StatusCode::CONFLICT);
    pub const FORBIDDEN: Self = Self::new("forbidden", "Access denied.", StatusCode::FORBIDDEN);
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new(
        "malformed_auth_token",
        "Malformed auth token.",
        StatusCode::UNAUTHORIZED,
    );
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "Missing auth token.",
        StatusCode::UNAUTHORIZED,
    );
    pub const MISSING_PATH_PARAM: Self = Self::new(
        "missing_path_param",
        "Missing path parameter.",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "Invalid credentials.",
        StatusCode::UNAUTHORIZED,
    );

    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            suggestion: None,
            validation: None,
            context: None,
            status,
        }
    }

    /// Sets the resource, nesting it under an existing one with `/`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{existing}/{resource}")),
            None => resource,
        });
        self
    }

    /// Appends a sentence to the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let message = message.into();
        let base = self.message.trim_end_matches('.');
        self.message = Cow::Owned(format!("{base}. {message}"));
        self
    }

    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {context}")),
            None => context,
        });
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        let suggestion = suggestion.into();
        self.suggestion = Some(match self.suggestion {
            Some(existing) => Cow::Owned(format!("{existing}; {suggestion}")),
            None => suggestion,
        });
        self
    }

    pub fn with_validation_errors(mut self, errors: Vec<ValidationErrorDetail>) -> Self {
        self.validation = Some(errors);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            status = %self.status,
            name = %self.name,
            message = %self.message,
            resource = ?self.resource,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_resources() {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("project")
            .with_resource("milestone");
        assert_eq!(response.resource.as_deref(), Some("project/milestone"));
    }

    #[test]
    fn appends_messages() {
        let response = ErrorResponse::CONFLICT.with_message("Invitation already accepted");
        assert_eq!(
            &response.message,
            "Resource state conflict. Invitation already accepted"
        );
    }

    #[test]
    fn hides_internal_fields() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_resource("invitation")
            .with_message("Cannot invite yourself")
            .with_context("sender equals receiver")
            .with_suggestion("Choose another student");

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["name"], "bad_request");
        assert_eq!(json["resource"], "invitation");
        assert_eq!(json["suggestion"], "Choose another student");
        assert!(json.get("context").is_none());
        assert!(json.get("status").is_none());
        assert!(json.get("validation").is_none());
        Ok(())
    }

    #[test]
    fn uses_status_code() {
        let response = ErrorResponse::FORBIDDEN.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
