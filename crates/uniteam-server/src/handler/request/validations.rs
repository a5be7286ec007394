//! Request validation and normalization helpers.

use serde::{Deserialize, Deserializer};
use uniteam_postgres::types::AccountRole;
use validator::ValidationError;

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_owned().into());
    error
}

/// Accepts the roles that may sign up without an administrator.
pub fn is_self_service_role(role: &AccountRole) -> Result<(), ValidationError> {
    match role {
        AccountRole::Student | AccountRole::Lecturer => Ok(()),
        AccountRole::Admin => Err(validation_error(
            "role_not_allowed",
            "Only STUDENT and LECTURER accounts can be registered",
        )),
    }
}

/// Rejects empty entries in a list of tags such as skills or courses.
pub fn has_no_blank_tags(tags: &[String]) -> Result<(), ValidationError> {
    for (index, tag) in tags.iter().enumerate() {
        if tag.trim().is_empty() {
            return Err(validation_error(
                "blank_tag",
                &format!("Entry #{} must not be blank", index + 1),
            ));
        }
        if tag.chars().count() > 100 {
            return Err(validation_error(
                "tag_too_long",
                &format!("Entry #{} must be at most 100 characters", index + 1),
            ));
        }
    }

    Ok(())
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`) in partial updates. Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims text fields before they reach the database.
pub trait Normalized {
    fn normalized(self) -> Self;
}

impl Normalized for String {
    fn normalized(self) -> Self {
        match self.trim() {
            trimmed if trimmed.len() == self.len() => self,
            trimmed => trimmed.to_owned(),
        }
    }
}

impl Normalized for Option<String> {
    fn normalized(self) -> Self {
        self.map(Normalized::normalized)
    }
}

impl Normalized for Vec<String> {
    fn normalized(self) -> Self {
        self.into_iter().map(Normalized::normalized).collect()
    }
}

impl Normalized for Option<Vec<String>> {
    fn normalized(self) -> Self {
        self.map(Normalized::normalized)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        phone_number: Option<Option<String>>,
    }

    #[test]
    fn double_option_separates_null_from_absent() -> anyhow::Result<()> {
        let absent: Patch = serde_json::from_str("{}")?;
        let cleared: Patch = serde_json::from_str(r#"{"phone_number":null}"#)?;
        let set: Patch = serde_json::from_str(r#"{"phone_number":"+44 1234"}"#)?;

        assert_eq!(absent.phone_number, None);
        assert_eq!(cleared.phone_number, Some(None));
        assert_eq!(set.phone_number, Some(Some("+44 1234".to_owned())));
        Ok(())
    }

    #[test]
    fn admins_cannot_self_register() {
        assert!(is_self_service_role(&AccountRole::Student).is_ok());
        assert!(is_self_service_role(&AccountRole::Lecturer).is_ok());
        assert!(is_self_service_role(&AccountRole::Admin).is_err());
    }

    #[test]
    fn trims_and_rejects_blank_tags() {
        let tags = vec![" rust ".to_owned(), "sql".to_owned()].normalized();
        assert_eq!(tags, vec!["rust", "sql"]);
        assert!(has_no_blank_tags(&tags).is_ok());
        assert!(has_no_blank_tags(&["  ".to_owned()]).is_err());
    }
}
