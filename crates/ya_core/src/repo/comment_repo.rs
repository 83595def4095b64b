//! Comment repository.
//!
//! # Invariants
//! - Comments of one article are listed `created ASC, id ASC`.

use crate::model::comment::{Comment, CommentId};
use crate::model::news::NewsId;
use crate::model::user::UserId;
use crate::model::EpochMillis;
use crate::repo::{count_to_u64, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COMMENT_SELECT_SQL: &str = "SELECT id, news_id, author_id, text, created FROM comments";

/// Insert shape for one comment. `created = None` means "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub news_id: NewsId,
    pub author_id: UserId,
    pub text: String,
    pub created: Option<EpochMillis>,
}

pub trait CommentRepository {
    fn create_comment(&self, draft: &CommentDraft) -> RepoResult<CommentId>;
    fn update_comment_text(&self, id: CommentId, text: &str) -> RepoResult<()>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Comments of one article, oldest first.
    fn list_for_news(&self, news_id: NewsId) -> RepoResult<Vec<Comment>>;
    fn count_comments(&self) -> RepoResult<u64>;
}

pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, draft: &CommentDraft) -> RepoResult<CommentId> {
        self.conn.execute(
            "INSERT INTO comments (news_id, author_id, text, created)
             VALUES (?1, ?2, ?3, COALESCE(?4, strftime('%s', 'now') * 1000));",
            params![
                draft.news_id,
                draft.author_id,
                draft.text.as_str(),
                draft.created
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_comment_text(&self, id: CommentId, text: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE comments SET text = ?2 WHERE id = ?1;",
            params![id, text],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "comment",
                id,
            });
        }
        Ok(())
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "comment",
                id,
            });
        }
        Ok(())
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let comment = self
            .conn
            .query_row(
                &format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_comment_row,
            )
            .optional()?;
        Ok(comment)
    }

    fn list_for_news(&self, news_id: NewsId) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE news_id = ?1
             ORDER BY created ASC, id ASC;"
        ))?;
        let comments = stmt
            .query_map(params![news_id], parse_comment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(comments)
    }

    fn count_comments(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments;", [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        news_id: row.get("news_id")?,
        author_id: row.get("author_id")?,
        text: row.get("text")?,
        created: row.get("created")?,
    })
}
