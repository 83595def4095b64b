//! Core domain logic for the `ya` notes and news applications.
//!
//! This crate owns the business invariants: ownership-based access policy,
//! note slug assignment, comment word filtering and listing order.

pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;
pub mod settings;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::comment::{Comment, CommentForm, CommentId};
pub use model::news::{News, NewsDraft, NewsId};
pub use model::note::{Note, NoteDraft, NoteForm, NoteId};
pub use model::user::{User, UserId};
pub use policy::{can_access, Access, Action, Owned, Requester};
pub use repo::comment_repo::{CommentDraft, CommentRepository, SqliteCommentRepository};
pub use repo::news_repo::{NewsRepository, SqliteNewsRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::news_service::{NewsDetail, NewsService};
pub use service::note_service::{NoteLimits, NoteService};
pub use service::ServiceError;
pub use settings::{Settings, SettingsError};
pub use validation::slug::{assign_slug, AssignedSlug, SlugError, SlugIndex, SlugSource};
pub use validation::translit::{slugify, transliterate};
pub use validation::word_filter::WordFilter;
pub use validation::{ValidationError, ValidationKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
