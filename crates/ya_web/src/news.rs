//! News application routes.
//!
//! # Responsibility
//! - Serve the public home page and article detail.
//! - Dispatch comment create/edit/delete to `NewsService`.
//!
//! # Invariants
//! - The comment form is rendered only for logged-in users.
//! - Successful comment writes redirect to the article's comment anchor.

use crate::http::{
    error_response, form_error_response, in_transaction, login_redirect, resolve_requester,
    Method, Request, Response,
};
use crate::page::{FormState, Page};
use crate::users;
use rusqlite::Connection;
use ya_core::{
    Action, CommentForm, CommentId, CommentRepository, NewsId, NewsRepository, NewsService,
    Requester, ServiceError, Settings, SqliteCommentRepository, SqliteNewsRepository,
};

const MODULE: &str = "news";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Home,
    Detail(NewsId),
    EditComment(CommentId),
    DeleteComment(CommentId),
}

impl Route {
    fn parse(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::Home);
        }

        let inner = path.strip_prefix('/')?.strip_suffix('/')?;
        let (prefix, raw_id) = inner.split_once('/')?;
        let id = parse_id(raw_id)?;
        match prefix {
            "news" => Some(Self::Detail(id)),
            "edit_comment" => Some(Self::EditComment(id)),
            "delete_comment" => Some(Self::DeleteComment(id)),
            _ => None,
        }
    }

    /// The home page and reading an article need no session.
    fn is_public(self, method: Method) -> bool {
        match self {
            Self::Home => true,
            Self::Detail(_) => method == Method::Get,
            Self::EditComment(_) | Self::DeleteComment(_) => false,
        }
    }

    fn allows(self, method: Method) -> bool {
        match self {
            Self::Home => method == Method::Get,
            Self::Detail(_) | Self::EditComment(_) => matches!(method, Method::Get | Method::Post),
            Self::DeleteComment(_) => true,
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Path of an article's comment block.
pub fn comments_anchor(news_id: NewsId) -> String {
    format!("/news/{news_id}/#comments")
}

/// News application bound to one database connection.
pub struct NewsApp {
    conn: Connection,
    settings: Settings,
}

impl NewsApp {
    pub fn new(conn: Connection, settings: Settings) -> Self {
        Self { conn, settings }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handles one request in its own transaction.
    pub fn handle(&mut self, request: &Request) -> Response {
        if let Some(response) = users::route(request, &self.settings.login_url) {
            return response;
        }
        let Some(route) = Route::parse(&request.path) else {
            return Response::not_found();
        };

        let settings = &self.settings;
        in_transaction(MODULE, &mut self.conn, request, |tx| {
            let requester = match resolve_requester(tx, request) {
                Ok(requester) => requester,
                Err(err) => {
                    return error_response(MODULE, err.into(), request, &settings.login_url)
                }
            };
            if !requester.is_authenticated() && !route.is_public(request.method) {
                return Response::found(login_redirect(&settings.login_url, &request.path));
            }
            if !route.allows(request.method) {
                return Response::method_not_allowed();
            }

            let news = NewsService::new(
                SqliteNewsRepository::new(tx),
                SqliteCommentRepository::new(tx),
                settings,
            );
            Handler {
                news,
                request,
                requester,
                login_url: &settings.login_url,
            }
            .dispatch(route)
        })
    }
}

struct Handler<'a, N, C> {
    news: NewsService<N, C>,
    request: &'a Request,
    requester: Requester,
    login_url: &'a str,
}

impl<N: NewsRepository, C: CommentRepository> Handler<'_, N, C> {
    fn dispatch(&self, route: Route) -> Response {
        let requester = self.requester;
        match (route, self.request.method) {
            (Route::Home, _) => match self.news.home() {
                Ok(news) => Response::ok(Page::NewsHome(news)),
                Err(err) => self.fail(err.into()),
            },
            (Route::Detail(news_id), Method::Get) => {
                let form = requester
                    .is_authenticated()
                    .then(|| FormState::blank(CommentForm::default()));
                self.detail_page(news_id, form)
            }
            (Route::Detail(news_id), _) => self.add_comment(requester, news_id),
            (Route::EditComment(comment_id), Method::Get) => {
                match self.news.comment_for(requester, comment_id, Action::Edit) {
                    Ok(comment) => Response::ok(Page::CommentEdit {
                        form: FormState::blank(CommentForm::new(comment.text.as_str())),
                        comment,
                    }),
                    Err(err) => self.fail(err),
                }
            }
            (Route::EditComment(comment_id), _) => self.edit_comment(requester, comment_id),
            (Route::DeleteComment(comment_id), Method::Get) => {
                match self.news.comment_for(requester, comment_id, Action::Delete) {
                    Ok(comment) => Response::ok(Page::CommentDelete(comment)),
                    Err(err) => self.fail(err),
                }
            }
            (Route::DeleteComment(comment_id), _) => {
                match self.news.delete_comment(requester, comment_id) {
                    Ok(comment) => Response::found(comments_anchor(comment.news_id)),
                    Err(err) => self.fail(err),
                }
            }
        }
    }

    fn detail_page(&self, news_id: NewsId, form: Option<FormState<CommentForm>>) -> Response {
        match self.news.detail(news_id) {
            Ok(detail) => Response::ok(Page::NewsDetail { detail, form }),
            Err(err) => self.fail(err),
        }
    }

    fn add_comment(&self, requester: Requester, news_id: NewsId) -> Response {
        let form = comment_form(self.request);
        match self.news.add_comment(requester, news_id, &form) {
            Ok(_) => Response::found(comments_anchor(news_id)),
            Err(ServiceError::Validation(errors)) => {
                self.detail_page(news_id, Some(FormState::invalid(form, errors)))
            }
            Err(err) => self.fail(err),
        }
    }

    fn edit_comment(&self, requester: Requester, comment_id: CommentId) -> Response {
        let comment = match self.news.comment_for(requester, comment_id, Action::Edit) {
            Ok(comment) => comment,
            Err(err) => return self.fail(err),
        };
        let form = comment_form(self.request);
        match self.news.edit_comment(requester, comment_id, &form) {
            Ok(updated) => Response::found(comments_anchor(updated.news_id)),
            Err(err) => form_error_response(MODULE, err, self.request, self.login_url, |errors| {
                Page::CommentEdit {
                    comment,
                    form: FormState::invalid(form, errors),
                }
            }),
        }
    }

    fn fail(&self, err: ServiceError) -> Response {
        error_response(MODULE, err, self.request, self.login_url)
    }
}

fn comment_form(request: &Request) -> CommentForm {
    CommentForm::new(request.field("text"))
}
