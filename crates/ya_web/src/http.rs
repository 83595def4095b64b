//! Request/response shapes and the per-request transaction boundary.
//!
//! # Responsibility
//! - Model the HTTP surface in-process: method, path, session user, form.
//! - Map service outcomes to status codes and redirects.
//! - Run each request inside one SQLite transaction.
//!
//! # Invariants
//! - A `500` response rolls the transaction back; anything else commits.
//! - Login redirects keep the requested path in `?next=` with `/` unescaped.
//! - A session user missing from the store is treated as anonymous.

use crate::page::Page;
use log::{error, info};
use rusqlite::{Connection, Transaction};
use std::collections::BTreeMap;
use ya_core::{
    RepoResult, Requester, ServiceError, SqliteUserRepository, UserId, UserRepository,
    ValidationError,
};

pub const STATUS_OK: u16 = 200;
pub const STATUS_FOUND: u16 = 302;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_SERVER_ERROR: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// One inbound request. `user` is the authenticated session user, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub user: Option<UserId>,
    pub form: BTreeMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            user: None,
            form: BTreeMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Marks the request as sent by a logged-in user.
    pub fn as_user(mut self, user_id: UserId) -> Self {
        self.user = Some(user_id);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    /// Submitted form value; a missing field reads as empty.
    pub fn field(&self, name: &str) -> &str {
        self.form.get(name).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Redirect target for `302` responses.
    pub location: Option<String>,
    /// Rendered page context for `200` responses.
    pub page: Option<Page>,
}

impl Response {
    pub fn ok(page: Page) -> Self {
        Self {
            status: STATUS_OK,
            location: None,
            page: Some(page),
        }
    }

    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: STATUS_FOUND,
            location: Some(location.into()),
            page: None,
        }
    }

    pub fn not_found() -> Self {
        Self::status(STATUS_NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::status(STATUS_METHOD_NOT_ALLOWED)
    }

    pub fn server_error() -> Self {
        Self::status(STATUS_SERVER_ERROR)
    }

    fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            page: None,
        }
    }
}

/// Login URL carrying `next` as the percent-encoded requested path.
pub fn login_redirect(login_url: &str, next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{login_url}?next={next}")
}

/// Resolves the session user against the store.
///
/// A session pointing at a deleted user is treated as anonymous.
pub fn resolve_requester(conn: &Connection, request: &Request) -> RepoResult<Requester> {
    let Some(user_id) = request.user else {
        return Ok(Requester::Anonymous);
    };
    let user = SqliteUserRepository::new(conn).get_user(user_id)?;
    if user.is_none() {
        info!("event=session_resolve module=web status=stale user_id={user_id}");
    }
    Ok(Requester::from(user.map(|user| user.id)))
}

/// Maps a service error from a non-form route to a response.
pub fn error_response(
    module: &'static str,
    err: ServiceError,
    request: &Request,
    login_url: &str,
) -> Response {
    match err {
        ServiceError::LoginRequired => Response::found(login_redirect(login_url, &request.path)),
        ServiceError::NotFound => Response::not_found(),
        other => {
            error!(
                "event=request_failed module={module} status=error method={} path={} error={other}",
                request.method.as_str(),
                request.path
            );
            Response::server_error()
        }
    }
}

/// Maps a service error from a form submission to a response.
///
/// Validation failures re-render through `on_invalid`; the store was not
/// modified, so the page is served with `200`.
pub fn form_error_response(
    module: &'static str,
    err: ServiceError,
    request: &Request,
    login_url: &str,
    on_invalid: impl FnOnce(Vec<ValidationError>) -> Page,
) -> Response {
    match err {
        ServiceError::Validation(errors) => {
            info!(
                "event=form_invalid module={module} status=rejected path={} error_count={}",
                request.path,
                errors.len()
            );
            Response::ok(on_invalid(errors))
        }
        other => error_response(module, other, request, login_url),
    }
}

/// Runs `handler` inside one transaction on `conn`.
pub fn in_transaction(
    module: &'static str,
    conn: &mut Connection,
    request: &Request,
    handler: impl FnOnce(&Transaction<'_>) -> Response,
) -> Response {
    let tx = match conn.transaction() {
        Ok(tx) => tx,
        Err(err) => {
            error!("event=tx_begin module={module} status=error error={err}");
            return Response::server_error();
        }
    };

    let response = handler(&tx);
    let finished = if response.status == STATUS_SERVER_ERROR {
        tx.rollback()
    } else {
        tx.commit()
    };
    let response = match finished {
        Ok(()) => response,
        Err(err) => {
            error!("event=tx_finish module={module} status=error error={err}");
            Response::server_error()
        }
    };

    info!(
        "event=http_request module={module} status=ok method={} path={} code={}",
        request.method.as_str(),
        request.path,
        response.status
    );
    response
}
