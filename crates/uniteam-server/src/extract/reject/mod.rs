//! Drop-in replacements for the axum extractors whose rejections are
//! rendered as [`Error`] responses and documented through aide.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// Shortens rejection text before it is echoed back to the client.
pub(crate) fn truncate_rejection(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_lines_and_length() {
        let message = "first line\nsecond line\nthird line";
        assert_eq!(truncate_rejection(message, 2, 200), "first line second line");
        assert_eq!(truncate_rejection(message, 3, 5), "first");
    }
}
