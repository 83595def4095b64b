//! In-process request surface for the `ya` notes and news applications.
//!
//! Requests are plain values (`Request`) and responses carry a status, an
//! optional redirect and a page context. Transport and templating are left
//! to the embedding server.

pub mod http;
pub mod news;
pub mod notes;
pub mod page;
pub mod users;

pub use http::{login_redirect, Method, Request, Response};
pub use news::NewsApp;
pub use notes::NotesApp;
pub use page::{FormState, Page};
