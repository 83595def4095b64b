//! Form-field validation shared by note and comment use-cases.
//!
//! # Responsibility
//! - Slug assignment and uniqueness rules for notes.
//! - Forbidden-word filtering for comments.
//! - Generic required/length checks with stable user-facing messages.
//!
//! # Invariants
//! - A validation failure never mutates the store.
//! - Every error names the form field it belongs to.

pub mod slug;
pub mod translit;
pub mod word_filter;

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_MESSAGE: &str = "Обязательное поле.";

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Field is missing or blank.
    Required,
    /// Field exceeds its maximum length.
    TooLong,
    /// Slug contains characters outside `[-a-zA-Z0-9_]` or is empty after
    /// derivation.
    InvalidSlug,
    /// Slug already used by another note.
    Duplicate,
    /// Comment text contains a forbidden word.
    BadWords,
}

impl ValidationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooLong => "too_long",
            Self::InvalidSlug => "invalid_slug",
            Self::Duplicate => "duplicate",
            Self::BadWords => "bad_words",
        }
    }
}

/// One field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Rejects blank values (after trim).
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(
            field,
            ValidationKind::Required,
            REQUIRED_MESSAGE,
        ));
    }
    Ok(())
}

/// Rejects values longer than `max_chars` characters.
pub fn max_length(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length > max_chars {
        return Err(ValidationError::new(
            field,
            ValidationKind::TooLong,
            format!(
                "Убедитесь, что это значение содержит не более {max_chars} символов (сейчас {length})."
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{max_length, require, ValidationKind};

    #[test]
    fn require_rejects_blank_values() {
        let err = require("title", "   ").unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.kind, ValidationKind::Required);
        assert!(require("title", "x").is_ok());
    }

    #[test]
    fn max_length_counts_chars_not_bytes() {
        assert!(max_length("title", "Заметка", 7).is_ok());
        let err = max_length("title", "Заметки!", 7).unwrap_err();
        assert_eq!(err.kind, ValidationKind::TooLong);
        assert!(err.message.contains("сейчас 8"));
    }

    #[test]
    fn validation_error_serializes_kind_in_snake_case() {
        let err = super::ValidationError::new("slug", ValidationKind::InvalidSlug, "bad");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"field": "slug", "kind": "invalid_slug", "message": "bad"})
        );
    }
}
