//! Public account pages shared by both applications.
//!
//! Authentication itself lives outside this crate; these routes only have
//! to exist and be reachable by anyone.
//!
//! # Invariants
//! - The login page is served at the configured `login_url`, the same path
//!   anonymous redirects point at.

use crate::http::{Method, Request, Response};
use crate::page::Page;

const LOGOUT_PATH: &str = "/auth/logout/";
const SIGNUP_PATH: &str = "/auth/signup/";

/// Serves the account pages; `None` when `request` is not an account route.
pub fn route(request: &Request, login_url: &str) -> Option<Response> {
    let page = match request.path.as_str() {
        path if path == login_url => Page::Login,
        LOGOUT_PATH => Page::Logout,
        SIGNUP_PATH => Page::Signup,
        _ => return None,
    };
    if request.method != Method::Get {
        return Some(Response::method_not_allowed());
    }
    Some(Response::ok(page))
}
