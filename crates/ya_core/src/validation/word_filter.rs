//! Forbidden-word filter for comment text.
//!
//! Matching is a case-sensitive substring search; a word embedded in a
//! longer word still matches.

use crate::validation::{ValidationError, ValidationKind};

/// Words rejected by default.
pub const BAD_WORDS: &[&str] = &["редиска", "негодяй"];

/// Fixed message attached to rejected comment text.
pub const WARNING: &str = "Не ругайтесь!";

const TEXT_FIELD: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFilter {
    words: Vec<String>,
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::new(BAD_WORDS.iter().copied())
    }
}

impl WordFilter {
    /// Builds a filter from a denylist. Blank entries are ignored so that an
    /// empty string never matches every text.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|word: &String| !word.is_empty())
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the first configured word found in `text`.
    pub fn find_forbidden(&self, text: &str) -> Option<&str> {
        self.words
            .iter()
            .find(|word| text.contains(word.as_str()))
            .map(String::as_str)
    }

    /// Rejects `text` containing any configured word.
    pub fn validate_text(&self, text: &str) -> Result<(), ValidationError> {
        if self.find_forbidden(text).is_some() {
            return Err(ValidationError::new(
                TEXT_FIELD,
                ValidationKind::BadWords,
                WARNING,
            ));
        }
        Ok(())
    }
}
