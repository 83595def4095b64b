//! News article record.
//!
//! Articles are read-only for the applications; they are seeded through the
//! repository API or the admin CLI.

use crate::model::EpochMillis;
use serde::{Deserialize, Serialize};

/// Stable news identifier.
pub type NewsId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub text: String,
    /// Publication date; home listing is sorted by this, newest first.
    pub date: EpochMillis,
}

/// Insert shape for one article. `date = None` means "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub text: String,
    pub date: Option<EpochMillis>,
}

impl NewsDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: None,
        }
    }

    pub fn dated(mut self, date: EpochMillis) -> Self {
        self.date = Some(date);
        self
    }
}
