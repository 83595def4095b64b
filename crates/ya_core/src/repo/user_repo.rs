//! User repository.

use crate::model::user::{User, UserId};
use crate::repo::{map_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait UserRepository {
    /// Creates a user; usernames are unique.
    fn create_user(&self, username: &str) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str) -> RepoResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RepoError::InvalidData("username must not be blank".to_string()));
        }

        self.conn
            .execute("INSERT INTO users (username) VALUES (?1);", [username])
            .map_err(|err| {
                map_unique_violation(err, || RepoError::DuplicateUsername(username.to_string()))
            })?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1;",
                params![id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
    })
}
