//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Repositories never check ownership; that is the policy's job.
//! - Constraint violations are reported as semantic errors
//!   (`DuplicateSlug`, `DuplicateUsername`), not raw SQLite errors.
//! - Every list query has a total, deterministic order.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_repo;
pub mod news_repo;
pub mod note_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    DuplicateSlug(String),
    DuplicateUsername(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "note slug already exists: {slug}"),
            Self::DuplicateUsername(name) => write!(f, "username already exists: {name}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a UNIQUE violation to `on_unique`, anything else to `RepoError::Db`.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    on_unique: impl FnOnce() -> RepoError,
) -> RepoError {
    let err = DbError::Sqlite(err);
    if err.is_unique_violation() {
        on_unique()
    } else {
        RepoError::Db(err)
    }
}

pub(crate) fn count_to_u64(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative row count {value}")))
}
