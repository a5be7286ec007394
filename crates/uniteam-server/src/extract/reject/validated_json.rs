//! JSON extractor that runs `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

/// Deserializes the body like [`Json`] and then calls [`Validate::validate`].
///
/// Failures become a `bad_request` whose message lists every broken rule and
/// whose `validation` field carries the per-field details.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

type Params = HashMap<Cow<'static, str>, serde_json::Value>;

fn number(params: &Params, key: &str) -> Option<f64> {
    params.get(key).and_then(serde_json::Value::as_f64)
}

fn bounds_message(field: &str, params: &Params, suffix: &str) -> Option<String> {
    let message = match (number(params, "min"), number(params, "max")) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max}{suffix}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}{suffix}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}{suffix}"),
        (None, None) => return None,
    };
    Some(message)
}

/// Renders one broken rule as a sentence.
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("Field '{field}': {message}");
    }

    match error.code.as_ref() {
        "length" => bounds_message(field, &error.params, " characters long")
            .unwrap_or_else(|| format!("Field '{field}' has an invalid length")),
        "range" => bounds_message(field, &error.params, "")
            .unwrap_or_else(|| format!("Field '{field}' is out of range")),
        "email" => format!("Field '{field}' must be a valid email address"),
        "required" => format!("Field '{field}' is required"),
        "must_match" => {
            let other = error
                .params
                .get("other")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("the other field");
            format!("Field '{field}' must match '{other}'")
        }
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut messages = Vec::new();
        let mut details = Vec::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = describe(&field, error);
                details.push(ValidationErrorDetail {
                    field: field.to_string(),
                    code: error.code.to_string(),
                    message: message.clone(),
                });
                messages.push(message);
            }
        }

        tracing::warn!(errors = messages.len(), "Request validation failed");

        let message = match messages.as_slice() {
            [] => "Validation failed".to_owned(),
            _ => messages.join(". "),
        };

        ErrorKind::BadRequest
            .with_message(message)
            .with_resource("request")
            .with_validation(details)
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 3, max = 32))]
        username: String,
        #[validate(email)]
        email_address: String,
        password: String,
        #[validate(must_match(other = "password"))]
        confirm_password: String,
    }

    #[test]
    fn lists_every_broken_rule() {
        let signup = Signup {
            username: "ab".into(),
            email_address: "not-an-email".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };

        let errors = signup.validate().err();
        let error = Error::from(errors.unwrap_or_default());
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let message = error.message().unwrap_or_default();
        assert!(message.contains("'username' must be between 3 and 32 characters long"));
        assert!(message.contains("'email_address' must be a valid email address"));
        assert!(message.contains("'confirm_password' must match 'password'"));
        assert_eq!(error.validation().map(<[_]>::len), Some(3));
    }
}
