//! Note record owned by one user and addressed by a unique slug.
//!
//! # Invariants
//! - `slug` is unique across all notes.
//! - `slug` is URL-safe (`[-a-zA-Z0-9_]`).

use crate::model::user::UserId;
use crate::policy::Owned;
use serde::{Deserialize, Serialize};

/// Stable note identifier.
pub type NoteId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: UserId,
}

/// Validated field set ready for insert or full replacement.
///
/// The slug is already resolved (explicit or derived from the title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Raw note form input as submitted by a client.
///
/// An empty `slug` asks for derivation from `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self::new(note.title.as_str(), note.text.as_str(), note.slug.as_str())
    }
}

impl Owned for Note {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}
