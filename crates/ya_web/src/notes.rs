//! Notes application routes.
//!
//! # Responsibility
//! - Parse notes paths and dispatch them to `NoteService`.
//! - Redirect successful writes to the success page.
//!
//! # Invariants
//! - Every note page except the home page requires login.
//! - A foreign note answers `404`, never `403`.

use crate::http::{
    error_response, form_error_response, in_transaction, login_redirect, resolve_requester,
    Method, Request, Response,
};
use crate::page::{FormState, Page};
use crate::users;
use rusqlite::Connection;
use ya_core::{
    Action, NoteForm, NoteLimits, NoteRepository, NoteService, RepoError, Requester,
    ServiceError, Settings, SlugIndex, SqliteNoteRepository,
};

const MODULE: &str = "notes";
const SUCCESS_PATH: &str = "/done/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Home,
    Add,
    Detail(&'a str),
    Edit(&'a str),
    Delete(&'a str),
    List,
    Done,
}

impl<'a> Route<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        match path {
            "/" => return Some(Self::Home),
            "/add/" => return Some(Self::Add),
            "/notes/" => return Some(Self::List),
            "/done/" => return Some(Self::Done),
            _ => {}
        }

        let inner = path.strip_prefix('/')?.strip_suffix('/')?;
        let (prefix, slug) = inner.split_once('/')?;
        if slug.is_empty() || slug.contains('/') {
            return None;
        }
        match prefix {
            "note" => Some(Self::Detail(slug)),
            "edit" => Some(Self::Edit(slug)),
            "delete" => Some(Self::Delete(slug)),
            _ => None,
        }
    }

    /// Only the home page is reachable without a session.
    fn is_public(self, _method: Method) -> bool {
        self == Self::Home
    }

    fn allows(self, method: Method) -> bool {
        match self {
            Self::Home | Self::Detail(_) | Self::List | Self::Done => method == Method::Get,
            Self::Add | Self::Edit(_) => matches!(method, Method::Get | Method::Post),
            Self::Delete(_) => true,
        }
    }
}

/// Notes application bound to one database connection.
pub struct NotesApp {
    conn: Connection,
    settings: Settings,
}

impl NotesApp {
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

            let notes = NoteService::new(SqliteNoteRepository::new(tx), NoteLimits::from(settings));
            Handler {
                notes,
                request,
                requester,
                login_url: &settings.login_url,
            }
            .dispatch(route)
        })
    }
}

struct Handler<'a, R> {
    notes: NoteService<R>,
    request: &'a Request,
    requester: Requester,
    login_url: &'a str,
}

impl<R> Handler<'_, R>
where
    R: NoteRepository + SlugIndex<Error = RepoError>,
{
    fn dispatch(&self, route: Route<'_>) -> Response {
        let requester = self.requester;
        match (route, self.request.method) {
            (Route::Home, _) => Response::ok(Page::NotesHome),
            (Route::List, _) => match self.notes.list_notes(requester) {
                Ok(notes) => Response::ok(Page::NoteList(notes)),
                Err(err) => self.fail(err),
            },
            (Route::Done, _) => match require_login(requester) {
                Ok(()) => Response::ok(Page::Done),
                Err(err) => self.fail(err),
            },
            (Route::Add, Method::Get) => match self.notes.ensure_can_create(requester) {
                Ok(()) => Response::ok(Page::NoteForm {
                    note: None,
                    form: FormState::blank(NoteForm::default()),
                }),
                Err(err) => self.fail(err),
            },
            (Route::Add, _) => self.create(requester),
            (Route::Detail(slug), _) => match self.notes.get_note(requester, slug, Action::Read) {
                Ok(note) => Response::ok(Page::NoteDetail(note)),
                Err(err) => self.fail(err),
            },
            (Route::Edit(slug), Method::Get) => {
                match self.notes.get_note(requester, slug, Action::Edit) {
                    Ok(note) => Response::ok(Page::NoteForm {
                        form: FormState::blank(NoteForm::from(&note)),
                        note: Some(note),
                    }),
                    Err(err) => self.fail(err),
                }
            }
            (Route::Edit(slug), _) => self.update(requester, slug),
            (Route::Delete(slug), Method::Get) => {
                match self.notes.get_note(requester, slug, Action::Delete) {
                    Ok(note) => Response::ok(Page::NoteDelete(note)),
                    Err(err) => self.fail(err),
                }
            }
            (Route::Delete(slug), _) => match self.notes.delete_note(requester, slug) {
                Ok(_) => Response::found(SUCCESS_PATH),
                Err(err) => self.fail(err),
            },
        }
    }

    fn create(&self, requester: Requester) -> Response {
        let form = note_form(self.request);
        match self.notes.create_note(requester, &form) {
            Ok(_) => Response::found(SUCCESS_PATH),
            Err(err) => form_error_response(MODULE, err, self.request, self.login_url, |errors| {
                Page::NoteForm {
                    note: None,
                    form: FormState::invalid(form, errors),
                }
            }),
        }
    }

    fn update(&self, requester: Requester, slug: &str) -> Response {
        let note = match self.notes.get_note(requester, slug, Action::Edit) {
            Ok(note) => note,
            Err(err) => return self.fail(err),
        };
        let form = note_form(self.request);
        match self.notes.update_note(requester, slug, &form) {
            Ok(_) => Response::found(SUCCESS_PATH),
            Err(err) => form_error_response(MODULE, err, self.request, self.login_url, |errors| {
                Page::NoteForm {
                    note: Some(note),
                    form: FormState::invalid(form, errors),
                }
            }),
        }
    }

    fn fail(&self, err: ServiceError) -> Response {
        error_response(MODULE, err, self.request, self.login_url)
    }
}

fn require_login(requester: Requester) -> Result<(), ServiceError> {
    if requester.is_authenticated() {
        Ok(())
    } else {
        Err(ServiceError::LoginRequired)
    }
}

fn note_form(request: &Request) -> NoteForm {
    NoteForm::new(
        request.field("title"),
        request.field("text"),
        request.field("slug"),
    )
}
