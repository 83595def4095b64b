//! News and comment use-case service.
//!
//! # Responsibility
//! - Public reads: home listing and article detail with comments.
//! - Comment create/edit/delete for authenticated authors.
//!
//! # Invariants
//! - Home listing holds at most `news_count_on_home_page` articles.
//! - Only the author may edit or delete a comment; others get `NotFound`.
//! - Comment text passes the forbidden-word filter before any write.

use crate::model::comment::{Comment, CommentForm, CommentId};
use crate::model::news::{News, NewsId};
use crate::policy::{Action, Requester};
use crate::repo::comment_repo::{CommentDraft, CommentRepository};
use crate::repo::news_repo::NewsRepository;
use crate::repo::RepoResult;
use crate::service::{authorize, ServiceError};
use crate::settings::Settings;
use crate::validation::require;
use crate::validation::word_filter::WordFilter;
use log::info;
use serde::Serialize;

const MODULE: &str = "news";

/// Article with its comments, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsDetail {
    pub news: News,
    pub comments: Vec<Comment>,
}

pub struct NewsService<N, C> {
    news_repo: N,
    comment_repo: C,
    page_size: usize,
    word_filter: WordFilter,
}

impl<N: NewsRepository, C: CommentRepository> NewsService<N, C> {
    pub fn new(news_repo: N, comment_repo: C, settings: &Settings) -> Self {
        Self {
            news_repo,
            comment_repo,
            page_size: settings.news_count_on_home_page,
            word_filter: settings.word_filter(),
        }
    }

    /// Newest articles for the home page.
    pub fn home(&self) -> RepoResult<Vec<News>> {
        self.news_repo.list_latest(self.page_size)
    }

    /// Public article detail.
    pub fn detail(&self, news_id: NewsId) -> Result<NewsDetail, ServiceError> {
        let news = self
            .news_repo
            .get_news(news_id)?
            .ok_or(ServiceError::NotFound)?;
        let comments = self.comment_repo.list_for_news(news_id)?;
        Ok(NewsDetail { news, comments })
    }

    /// Adds a comment by the requester to an existing article.
    pub fn add_comment(
        &self,
        requester: Requester,
        news_id: NewsId,
        form: &CommentForm,
    ) -> Result<Comment, ServiceError> {
        authorize::<Comment>(MODULE, requester, None, Action::Create)?;
        let author_id = requester.user_id().ok_or(ServiceError::LoginRequired)?;
        if self.news_repo.get_news(news_id)?.is_none() {
            return Err(ServiceError::NotFound);
        }

        let text = self.clean_text(form)?;
        let comment_id = self.comment_repo.create_comment(&CommentDraft {
            news_id,
            author_id,
            text,
            created: None,
        })?;
        info!(
            "event=comment_create module={MODULE} status=ok comment_id={comment_id} news_id={news_id} author_id={author_id}"
        );

        self.comment_repo
            .get_comment(comment_id)?
            .ok_or(ServiceError::InconsistentState(
                "created comment not found in read-back",
            ))
    }

    /// Returns a comment the requester may act on with `action`.
    pub fn comment_for(
        &self,
        requester: Requester,
        comment_id: CommentId,
        action: Action,
    ) -> Result<Comment, ServiceError> {
        let comment = self.comment_repo.get_comment(comment_id)?;
        authorize(MODULE, requester, comment.as_ref(), action)?;
        comment.ok_or(ServiceError::NotFound)
    }

    /// Replaces the text of one of the requester's comments.
    pub fn edit_comment(
        &self,
        requester: Requester,
        comment_id: CommentId,
        form: &CommentForm,
    ) -> Result<Comment, ServiceError> {
        let comment = self.comment_for(requester, comment_id, Action::Edit)?;
        let text = self.clean_text(form)?;
        self.comment_repo.update_comment_text(comment.id, &text)?;
        info!(
            "event=comment_update module={MODULE} status=ok comment_id={}",
            comment.id
        );
        Ok(Comment { text, ..comment })
    }

    /// Deletes one of the requester's comments and returns it.
    pub fn delete_comment(
        &self,
        requester: Requester,
        comment_id: CommentId,
    ) -> Result<Comment, ServiceError> {
        let comment = self.comment_for(requester, comment_id, Action::Delete)?;
        self.comment_repo.delete_comment(comment.id)?;
        info!(
            "event=comment_delete module={MODULE} status=ok comment_id={}",
            comment.id
        );
        Ok(comment)
    }

    pub fn count_comments(&self) -> RepoResult<u64> {
        self.comment_repo.count_comments()
    }

    fn clean_text(&self, form: &CommentForm) -> Result<String, ServiceError> {
        let text = form.text.trim();
        if let Err(err) = require("text", text).and_then(|()| self.word_filter.validate_text(text)) {
            info!(
                "event=comment_validate module={MODULE} status=rejected kind={}",
                err.kind.as_str()
            );
            return Err(err.into());
        }
        Ok(text.to_string())
    }
}
