//! News repository.
//!
//! # Invariants
//! - Home listing is `date DESC, id ASC`: newest first, insertion order on
//!   equal dates.

use crate::model::news::{News, NewsDraft, NewsId};
use crate::repo::{count_to_u64, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NEWS_SELECT_SQL: &str = "SELECT id, title, text, date FROM news";

pub trait NewsRepository {
    fn create_news(&self, draft: &NewsDraft) -> RepoResult<NewsId>;
    /// Inserts many articles in one transaction, preserving input order.
    fn create_news_batch(&self, drafts: &[NewsDraft]) -> RepoResult<Vec<NewsId>>;
    fn get_news(&self, id: NewsId) -> RepoResult<Option<News>>;
    /// Newest `limit` articles.
    fn list_latest(&self, limit: usize) -> RepoResult<Vec<News>>;
    fn count_news(&self) -> RepoResult<u64>;
}

pub struct SqliteNewsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNewsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NewsRepository for SqliteNewsRepository<'_> {
    fn create_news(&self, draft: &NewsDraft) -> RepoResult<NewsId> {
        insert_news(self.conn, draft)
    }

    fn create_news_batch(&self, drafts: &[NewsDraft]) -> RepoResult<Vec<NewsId>> {
        // SAVEPOINT nests inside a caller transaction and also works standalone.
        self.conn.execute_batch("SAVEPOINT news_batch;")?;
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match insert_news(self.conn, draft) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    self.conn
                        .execute_batch("ROLLBACK TO news_batch; RELEASE news_batch;")?;
                    return Err(err);
                }
            }
        }
        self.conn.execute_batch("RELEASE news_batch;")?;
        Ok(ids)
    }

    fn get_news(&self, id: NewsId) -> RepoResult<Option<News>> {
        let news = self
            .conn
            .query_row(
                &format!("{NEWS_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_news_row,
            )
            .optional()?;
        Ok(news)
    }

    fn list_latest(&self, limit: usize) -> RepoResult<Vec<News>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&format!(
            "{NEWS_SELECT_SQL}
             ORDER BY date DESC, id ASC
             LIMIT ?1;"
        ))?;
        let news = stmt
            .query_map(params![limit], parse_news_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(news)
    }

    fn count_news(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news;", [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

fn insert_news(conn: &Connection, draft: &NewsDraft) -> RepoResult<NewsId> {
    conn.execute(
        "INSERT INTO news (title, text, date)
         VALUES (?1, ?2, COALESCE(?3, strftime('%s', 'now') * 1000));",
        params![draft.title.as_str(), draft.text.as_str(), draft.date],
    )?;
    Ok(conn.last_insert_rowid())
}

fn parse_news_row(row: &Row<'_>) -> rusqlite::Result<News> {
    Ok(News {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        date: row.get("date")?,
    })
}
