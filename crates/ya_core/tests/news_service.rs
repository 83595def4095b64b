use rusqlite::Connection;
use ya_core::db::open_db_in_memory;
use ya_core::model::DAY_MILLIS;
use ya_core::validation::word_filter::{BAD_WORDS, WARNING};
use ya_core::{
    Action, CommentDraft, CommentForm, CommentRepository, NewsDraft, NewsId, NewsRepository,
    NewsService, Requester, ServiceError, Settings, SqliteCommentRepository,
    SqliteNewsRepository, SqliteUserRepository, User, UserRepository, ValidationKind,
};

const BASE_DATE: i64 = 1_700_000_000_000;

type Service<'conn> = NewsService<SqliteNewsRepository<'conn>, SqliteCommentRepository<'conn>>;

fn service<'conn>(conn: &'conn Connection, settings: &Settings) -> Service<'conn> {
    NewsService::new(
        SqliteNewsRepository::new(conn),
        SqliteCommentRepository::new(conn),
        settings,
    )
}

fn create_user(conn: &Connection, username: &str) -> User {
    SqliteUserRepository::new(conn).create_user(username).unwrap()
}

fn create_news(conn: &Connection) -> NewsId {
    SqliteNewsRepository::new(conn)
        .create_news(&NewsDraft::new("Заголовок", "Текст").dated(BASE_DATE))
        .unwrap()
}

#[test]
fn home_page_shows_configured_number_of_newest_news() {
    let conn = open_db_in_memory().unwrap();
    let settings = Settings::default();
    let drafts: Vec<_> = (0..=settings.news_count_on_home_page as i64)
        .map(|index| {
            NewsDraft::new(format!("Новость {index}"), "Просто текст.")
                .dated(BASE_DATE - index * DAY_MILLIS)
        })
        .collect();
    SqliteNewsRepository::new(&conn)
        .create_news_batch(&drafts)
        .unwrap();
    let news = service(&conn, &settings);

    let home = news.home().unwrap();

    assert_eq!(home.len(), settings.news_count_on_home_page);
    let dates: Vec<_> = home.iter().map(|item| item.date).collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(home[0].title, "Новость 0");
}

#[test]
fn home_page_size_follows_settings() {
    let conn = open_db_in_memory().unwrap();
    let settings = Settings::from_toml_str("news_count_on_home_page = 3").unwrap();
    let drafts: Vec<_> = (0..5)
        .map(|index| NewsDraft::new(format!("Новость {index}"), "Текст").dated(BASE_DATE + index))
        .collect();
    SqliteNewsRepository::new(&conn)
        .create_news_batch(&drafts)
        .unwrap();

    let home = service(&conn, &settings).home().unwrap();

    let titles: Vec<_> = home.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Новость 4", "Новость 3", "Новость 2"]);
}

#[test]
fn news_with_equal_dates_keep_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);
    let first = repo
        .create_news(&NewsDraft::new("Первая", "Текст").dated(BASE_DATE))
        .unwrap();
    let second = repo
        .create_news(&NewsDraft::new("Вторая", "Текст").dated(BASE_DATE))
        .unwrap();

    let home = service(&conn, &Settings::default()).home().unwrap();

    let ids: Vec<_> = home.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn detail_lists_comments_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news_id = create_news(&conn);
    let comments = SqliteCommentRepository::new(&conn);
    for index in (0..10).rev() {
        comments
            .create_comment(&CommentDraft {
                news_id,
                author_id: author.id,
                text: format!("Текст {index}"),
                created: Some(BASE_DATE + index * DAY_MILLIS),
            })
            .unwrap();
    }

    let detail = service(&conn, &Settings::default()).detail(news_id).unwrap();

    assert_eq!(detail.news.id, news_id);
    assert_eq!(detail.comments.len(), 10);
    let created: Vec<_> = detail.comments.iter().map(|comment| comment.created).collect();
    let mut sorted = created.clone();
    sorted.sort_unstable();
    assert_eq!(created, sorted);
    assert_eq!(detail.comments[0].text, "Текст 0");
}

#[test]
fn detail_of_missing_news_is_not_found() {
    let conn = open_db_in_memory().unwrap();

    let err = service(&conn, &Settings::default()).detail(404).unwrap_err();

    assert!(matches!(err, ServiceError::NotFound));
}

#[test]
fn anonymous_user_cant_create_comment() {
    let conn = open_db_in_memory().unwrap();
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());

    let err = news
        .add_comment(Requester::Anonymous, news_id, &CommentForm::new("Текст комментария"))
        .unwrap_err();

    assert!(matches!(err, ServiceError::LoginRequired));
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn user_can_create_comment() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());

    let comment = news
        .add_comment(
            Requester::User(author.id),
            news_id,
            &CommentForm::new("Текст комментария"),
        )
        .unwrap();

    assert_eq!(news.count_comments().unwrap(), 1);
    assert_eq!(comment.text, "Текст комментария");
    assert_eq!(comment.news_id, news_id);
    assert_eq!(comment.author_id, author.id);
}

#[test]
fn comment_on_missing_news_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news = service(&conn, &Settings::default());

    let err = news
        .add_comment(Requester::User(author.id), 77, &CommentForm::new("Текст"))
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound));
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn user_cant_use_bad_words() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());

    let err = news
        .add_comment(
            Requester::User(author.id),
            news_id,
            &CommentForm::new(format!("Какой-то текст, {}, еще текст", BAD_WORDS[0])),
        )
        .unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "text");
    assert_eq!(errors[0].kind, ValidationKind::BadWords);
    assert_eq!(errors[0].message, WARNING);
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn word_filter_is_case_sensitive_and_configurable() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news_id = create_news(&conn);
    let settings = Settings::from_toml_str("bad_words = [\"плохо\"]").unwrap();
    let news = service(&conn, &settings);
    let requester = Requester::User(author.id);

    news.add_comment(requester, news_id, &CommentForm::new("ПЛОХО, но можно"))
        .unwrap();
    news.add_comment(requester, news_id, &CommentForm::new("редиска тоже можно"))
        .unwrap();
    assert!(news
        .add_comment(requester, news_id, &CommentForm::new("это плохо"))
        .is_err());

    assert_eq!(news.count_comments().unwrap(), 2);
}

#[test]
fn blank_comment_is_required() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Комментатор");
    let news_id = create_news(&conn);

    let err = service(&conn, &Settings::default())
        .add_comment(Requester::User(author.id), news_id, &CommentForm::new("   "))
        .unwrap_err();

    assert_eq!(
        err.validation_errors().unwrap()[0].kind,
        ValidationKind::Required
    );
}

#[test]
fn author_can_edit_and_delete_comment() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Автор комментария");
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());
    let requester = Requester::User(author.id);
    let comment = news
        .add_comment(requester, news_id, &CommentForm::new("Текст комментария"))
        .unwrap();

    let edited = news
        .edit_comment(requester, comment.id, &CommentForm::new("Обновлённый комментарий"))
        .unwrap();
    assert_eq!(edited.text, "Обновлённый комментарий");
    assert_eq!(edited.created, comment.created);
    let stored = SqliteCommentRepository::new(&conn)
        .get_comment(comment.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.text, "Обновлённый комментарий");

    let deleted = news.delete_comment(requester, comment.id).unwrap();
    assert_eq!(deleted.id, comment.id);
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn user_cant_edit_or_delete_comment_of_another_user() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Автор комментария");
    let reader = create_user(&conn, "Читатель");
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());
    let comment = news
        .add_comment(
            Requester::User(author.id),
            news_id,
            &CommentForm::new("Текст комментария"),
        )
        .unwrap();
    let intruder = Requester::User(reader.id);

    assert!(matches!(
        news.edit_comment(intruder, comment.id, &CommentForm::new("Чужой текст")),
        Err(ServiceError::NotFound)
    ));
    assert!(matches!(
        news.delete_comment(intruder, comment.id),
        Err(ServiceError::NotFound)
    ));
    assert!(matches!(
        news.comment_for(Requester::Anonymous, comment.id, Action::Edit),
        Err(ServiceError::LoginRequired)
    ));

    let stored = SqliteCommentRepository::new(&conn)
        .get_comment(comment.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.text, "Текст комментария");
    assert_eq!(news.count_comments().unwrap(), 1);
}

#[test]
fn bad_words_are_rejected_on_edit() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "Автор комментария");
    let news_id = create_news(&conn);
    let news = service(&conn, &Settings::default());
    let requester = Requester::User(author.id);
    let comment = news
        .add_comment(requester, news_id, &CommentForm::new("Текст комментария"))
        .unwrap();

    let err = news
        .edit_comment(requester, comment.id, &CommentForm::new(BAD_WORDS[1]))
        .unwrap_err();

    assert_eq!(
        err.validation_errors().unwrap()[0].kind,
        ValidationKind::BadWords
    );
    let stored = news.comment_for(requester, comment.id, Action::Read).unwrap();
    assert_eq!(stored.text, "Текст комментария");
}
