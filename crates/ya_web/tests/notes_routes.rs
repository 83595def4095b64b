use ya_core::db::open_db_in_memory;
use ya_core::validation::slug::SLUG_WARNING;
use ya_core::{
    Note, NoteRepository, Settings, SqliteNoteRepository, SqliteUserRepository, UserId,
    UserRepository, ValidationKind,
};
use ya_web::http::{
    STATUS_FOUND, STATUS_METHOD_NOT_ALLOWED, STATUS_NOT_FOUND, STATUS_OK,
};
use ya_web::{NotesApp, Page, Request};

struct Fixture {
    app: NotesApp,
    author: UserId,
    reader: UserId,
    note: Note,
}

fn fixture() -> Fixture {
    let mut app = NotesApp::new(open_db_in_memory().unwrap(), Settings::default());
    let users = SqliteUserRepository::new(app.connection());
    let author = users.create_user("Автор").unwrap().id;
    let reader = users.create_user("Читатель").unwrap().id;

    let response = app.handle(
        &Request::post("/add/")
            .as_user(author)
            .with_field("title", "Заголовок")
            .with_field("text", "Текст")
            .with_field("slug", "note-slug"),
    );
    assert_eq!(response.status, STATUS_FOUND);
    let note = stored_note(&app, "note-slug").unwrap();

    Fixture {
        app,
        author,
        reader,
        note,
    }
}

fn stored_note(app: &NotesApp, slug: &str) -> Option<Note> {
    SqliteNoteRepository::new(app.connection())
        .get_note_by_slug(slug)
        .unwrap()
}

fn note_count(app: &NotesApp) -> u64 {
    SqliteNoteRepository::new(app.connection())
        .count_notes()
        .unwrap()
}

#[test]
fn pages_available_for_anonymous_user() {
    let mut fx = fixture();
    for path in ["/", "/auth/login/", "/auth/logout/", "/auth/signup/"] {
        let response = fx.app.handle(&Request::get(path));
        assert_eq!(response.status, STATUS_OK, "path {path}");
    }
}

#[test]
fn pages_available_for_auth_user() {
    let mut fx = fixture();
    for path in ["/notes/", "/done/", "/add/"] {
        let response = fx.app.handle(&Request::get(path).as_user(fx.reader));
        assert_eq!(response.status, STATUS_OK, "path {path}");
    }
}

#[test]
fn note_pages_available_for_author_only() {
    let mut fx = fixture();
    let slug = fx.note.slug.clone();
    for path in [
        format!("/note/{slug}/"),
        format!("/edit/{slug}/"),
        format!("/delete/{slug}/"),
    ] {
        let own = fx.app.handle(&Request::get(path.as_str()).as_user(fx.author));
        assert_eq!(own.status, STATUS_OK, "author {path}");

        let foreign = fx.app.handle(&Request::get(path.as_str()).as_user(fx.reader));
        assert_eq!(foreign.status, STATUS_NOT_FOUND, "reader {path}");
    }
}

#[test]
fn anonymous_user_is_redirected_to_login() {
    let mut fx = fixture();
    let slug = fx.note.slug.clone();
    for path in [
        "/notes/".to_string(),
        "/done/".to_string(),
        "/add/".to_string(),
        format!("/note/{slug}/"),
        format!("/edit/{slug}/"),
        format!("/delete/{slug}/"),
    ] {
        let response = fx.app.handle(&Request::get(path.as_str()));
        assert_eq!(response.status, STATUS_FOUND, "path {path}");
        assert_eq!(
            response.location,
            Some(format!("/auth/login/?next={path}")),
            "path {path}"
        );
    }
}

#[test]
fn anonymous_post_creates_nothing() {
    let mut fx = fixture();
    let before = note_count(&fx.app);

    let response = fx.app.handle(
        &Request::post("/add/")
            .with_field("title", "Новый")
            .with_field("text", "Текст"),
    );

    assert_eq!(response.status, STATUS_FOUND);
    assert_eq!(
        response.location.as_deref(),
        Some("/auth/login/?next=/add/")
    );
    assert_eq!(note_count(&fx.app), before);
}

#[test]
fn auth_user_creates_note_and_is_redirected_to_done() {
    let mut fx = fixture();

    let response = fx.app.handle(
        &Request::post("/add/")
            .as_user(fx.reader)
            .with_field("title", "Название заметки")
            .with_field("text", "Текст заметки"),
    );

    assert_eq!(response.status, STATUS_FOUND);
    assert_eq!(response.location.as_deref(), Some("/done/"));
    let note = stored_note(&fx.app, "nazvanie-zametki").unwrap();
    assert_eq!(note.author_id, fx.reader);
    assert_eq!(note.text, "Текст заметки");
}

#[test]
fn duplicate_slug_rerenders_form_with_error() {
    let mut fx = fixture();
    let before = note_count(&fx.app);

    let response = fx.app.handle(
        &Request::post("/add/")
            .as_user(fx.author)
            .with_field("title", "Другая")
            .with_field("text", "Текст")
            .with_field("slug", fx.note.slug.as_str()),
    );

    assert_eq!(response.status, STATUS_OK);
    match response.page {
        Some(Page::NoteForm { note: None, form }) => {
            assert_eq!(form.values.title, "Другая");
            assert_eq!(form.errors.len(), 1);
            assert_eq!(form.errors[0].kind, ValidationKind::Duplicate);
            assert_eq!(
                form.errors[0].message,
                format!("{}{SLUG_WARNING}", fx.note.slug)
            );
        }
        other => panic!("unexpected page: {other:?}"),
    }
    assert_eq!(note_count(&fx.app), before);
}

#[test]
fn author_can_edit_note() {
    let mut fx = fixture();
    let path = format!("/edit/{}/", fx.note.slug);

    let response = fx.app.handle(
        &Request::post(path.as_str())
            .as_user(fx.author)
            .with_field("title", "Новый заголовок")
            .with_field("text", "Новый текст")
            .with_field("slug", "new-slug"),
    );

    assert_eq!(response.status, STATUS_FOUND);
    assert_eq!(response.location.as_deref(), Some("/done/"));
    assert!(stored_note(&fx.app, &fx.note.slug).is_none());
    let edited = stored_note(&fx.app, "new-slug").unwrap();
    assert_eq!(edited.id, fx.note.id);
    assert_eq!(edited.title, "Новый заголовок");
}

#[test]
fn other_user_cant_edit_note() {
    let mut fx = fixture();
    let path = format!("/edit/{}/", fx.note.slug);

    let response = fx.app.handle(
        &Request::post(path.as_str())
            .as_user(fx.reader)
            .with_field("title", "Чужой")
            .with_field("text", "Чужой текст"),
    );

    assert_eq!(response.status, STATUS_NOT_FOUND);
    assert_eq!(stored_note(&fx.app, &fx.note.slug), Some(fx.note.clone()));
}

#[test]
fn author_can_delete_note() {
    let mut fx = fixture();
    let path = format!("/delete/{}/", fx.note.slug);

    let response = fx.app.handle(&Request::post(path.as_str()).as_user(fx.author));

    assert_eq!(response.status, STATUS_FOUND);
    assert_eq!(response.location.as_deref(), Some("/done/"));
    assert_eq!(note_count(&fx.app), 0);
}

#[test]
fn other_user_cant_delete_note() {
    let mut fx = fixture();
    let path = format!("/delete/{}/", fx.note.slug);

    let response = fx.app.handle(&Request::delete(path.as_str()).as_user(fx.reader));

    assert_eq!(response.status, STATUS_NOT_FOUND);
    assert_eq!(note_count(&fx.app), 1);
}

#[test]
fn list_shows_only_own_notes() {
    let mut fx = fixture();

    let own = fx.app.handle(&Request::get("/notes/").as_user(fx.author));
    assert_eq!(own.page, Some(Page::NoteList(vec![fx.note.clone()])));

    let foreign = fx.app.handle(&Request::get("/notes/").as_user(fx.reader));
    assert_eq!(foreign.page, Some(Page::NoteList(Vec::new())));
}

#[test]
fn create_and_edit_pages_contain_form() {
    let mut fx = fixture();

    let add = fx.app.handle(&Request::get("/add/").as_user(fx.author));
    assert!(matches!(add.page, Some(Page::NoteForm { note: None, .. })));

    let path = format!("/edit/{}/", fx.note.slug);
    let edit = fx.app.handle(&Request::get(path.as_str()).as_user(fx.author));
    match edit.page {
        Some(Page::NoteForm {
            note: Some(note),
            form,
        }) => {
            assert_eq!(note, fx.note);
            assert_eq!(form.values.slug, fx.note.slug);
            assert!(form.is_valid());
        }
        other => panic!("unexpected page: {other:?}"),
    }
}

#[test]
fn unknown_path_and_method_are_rejected() {
    let mut fx = fixture();

    assert_eq!(
        fx.app.handle(&Request::get("/missing/")).status,
        STATUS_NOT_FOUND
    );
    assert_eq!(
        fx.app
            .handle(&Request::delete("/notes/").as_user(fx.author))
            .status,
        STATUS_METHOD_NOT_ALLOWED
    );
    assert_eq!(
        fx.app
            .handle(&Request::get("/note/missing/").as_user(fx.author))
            .status,
        STATUS_NOT_FOUND
    );
}

#[test]
fn anonymous_unsupported_method_is_redirected_to_login() {
    let mut fx = fixture();
    let slug = fx.note.slug.clone();
    for request in [
        Request::delete(format!("/edit/{slug}/")),
        Request::post(format!("/note/{slug}/")),
        Request::post("/notes/"),
        Request::delete("/done/"),
    ] {
        let response = fx.app.handle(&request);
        assert_eq!(response.status, STATUS_FOUND, "path {}", request.path);
        assert_eq!(
            response.location,
            Some(format!("/auth/login/?next={}", request.path))
        );
    }
    assert_eq!(stored_note(&fx.app, &slug), Some(fx.note.clone()));

    let response = fx
        .app
        .handle(&Request::post(format!("/note/{slug}/")).as_user(fx.author));
    assert_eq!(response.status, STATUS_METHOD_NOT_ALLOWED);
}

#[test]
fn configured_login_url_is_served_and_redirected_to() {
    let settings = Settings {
        login_url: "/accounts/login/".to_string(),
        ..Settings::default()
    };
    let mut app = NotesApp::new(open_db_in_memory().unwrap(), settings);

    let response = app.handle(&Request::get("/notes/"));
    assert_eq!(response.status, STATUS_FOUND);
    assert_eq!(
        response.location.as_deref(),
        Some("/accounts/login/?next=/notes/")
    );

    let login = app.handle(&Request::get("/accounts/login/"));
    assert_eq!(login.status, STATUS_OK);
    assert_eq!(login.page, Some(Page::Login));
    assert_eq!(
        app.handle(&Request::get("/auth/login/")).status,
        STATUS_NOT_FOUND
    );
}

#[test]
fn session_of_missing_user_is_treated_as_anonymous() {
    let mut fx = fixture();
    let before = note_count(&fx.app);

    let listed = fx.app.handle(&Request::get("/notes/").as_user(9999));
    assert_eq!(listed.status, STATUS_FOUND);
    assert_eq!(
        listed.location.as_deref(),
        Some("/auth/login/?next=/notes/")
    );

    let created = fx.app.handle(
        &Request::post("/add/")
            .as_user(9999)
            .with_field("title", "Новый")
            .with_field("text", "Текст"),
    );
    assert_eq!(created.status, STATUS_FOUND);
    assert_eq!(note_count(&fx.app), before);
}
