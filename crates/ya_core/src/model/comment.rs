//! Comment record attached to one news article.
//!
//! # Invariants
//! - Comments of one article read back in `created` order, ties by id.

use crate::model::news::NewsId;
use crate::model::user::UserId;
use crate::model::EpochMillis;
use crate::policy::Owned;
use serde::{Deserialize, Serialize};

/// Stable comment identifier.
pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub news_id: NewsId,
    pub author_id: UserId,
    pub text: String,
    pub created: EpochMillis,
}

/// Raw comment form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Owned for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}
