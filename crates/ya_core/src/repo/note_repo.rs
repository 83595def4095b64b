//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes keyed by id and addressed by slug.
//! - Answer slug-collision lookups for slug assignment.
//!
//! # Invariants
//! - `notes.slug` is UNIQUE; a collision on write is `RepoError::DuplicateSlug`.
//! - Author listings are ordered by `id ASC` (creation order).

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::user::UserId;
use crate::repo::{count_to_u64, map_unique_violation, RepoError, RepoResult};
use crate::validation::slug::SlugIndex;
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    slug,
    author_id
FROM notes";

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts a note owned by `author_id` and returns its id.
    fn create_note(&self, author_id: UserId, draft: &NoteDraft) -> RepoResult<NoteId>;
    /// Replaces title, text and slug of an existing note.
    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Lists notes of one author in creation order.
    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>>;
    /// Whether `slug` is used by a note other than `exclude`.
    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool>;
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, author_id: UserId, draft: &NoteDraft) -> RepoResult<NoteId> {
        self.conn
            .execute(
                "INSERT INTO notes (title, text, slug, author_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    draft.title.as_str(),
                    draft.text.as_str(),
                    draft.slug.as_str(),
                    author_id
                ],
            )
            .map_err(|err| map_unique_violation(err, || RepoError::DuplicateSlug(draft.slug.clone())))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    text = ?3,
                    slug = ?4
                 WHERE id = ?1;",
                params![
                    id,
                    draft.title.as_str(),
                    draft.text.as_str(),
                    draft.slug.as_str()
                ],
            )
            .map_err(|err| map_unique_violation(err, || RepoError::DuplicateSlug(draft.slug.clone())))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "note", id });
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "note", id });
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE slug = ?1;"),
                [slug],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE author_id = ?1
             ORDER BY id ASC;"
        ))?;
        let notes = stmt
            .query_map(params![author_id], parse_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM notes
                WHERE slug = ?1
                  AND (?2 IS NULL OR id <> ?2)
            );",
            params![slug, exclude],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

impl SlugIndex for SqliteNoteRepository<'_> {
    type Error = RepoError;

    fn slug_taken(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        self.slug_exists(slug, exclude)
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author_id: row.get("author_id")?,
    })
}
