//! Admin CLI for seeding and inspecting a `ya` database.
//!
//! # Responsibility
//! - Create users and news articles outside the web surface.
//! - Keep output line-oriented and deterministic for scripting.
//!
//! # Invariants
//! - Exit code `0` on success, `1` on a failed command, `2` on bad usage.
//! - File logging starts only when `YA_LOG_DIR` is set.

use log::info;
use std::process::ExitCode;
use ya_core::db::open_db;
use ya_core::{
    core_version, default_log_level, init_logging, NewsDraft, NewsRepository,
    SqliteNewsRepository, SqliteUserRepository, UserRepository,
};

const USAGE: &str = "usage: ya_cli <db-path> <command>
commands:
  version
  create-user <username>
  seed-news <title> <text>
  list-news";

const LIST_NEWS_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Version,
    CreateUser { username: String },
    SeedNews { title: String, text: String },
    ListNews,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    db_path: String,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let [db_path, name, rest @ ..] = args else {
        return Err("missing <db-path> or <command>".to_string());
    };
    let command = match (name.as_str(), rest) {
        ("version", []) => Command::Version,
        ("create-user", [username]) => Command::CreateUser {
            username: username.clone(),
        },
        ("seed-news", [title, text]) => Command::SeedNews {
            title: title.clone(),
            text: text.clone(),
        },
        ("list-news", []) => Command::ListNews,
        (other, _) => return Err(format!("unknown command or arguments: `{other}`")),
    };
    Ok(Invocation {
        db_path: db_path.clone(),
        command,
    })
}

fn run(invocation: &Invocation) -> Result<Vec<String>, String> {
    if invocation.command == Command::Version {
        return Ok(vec![format!("ya_core version={}", core_version())]);
    }

    let conn = open_db(&invocation.db_path).map_err(|err| format!("db open failed: {err}"))?;
    match &invocation.command {
        Command::Version => Ok(Vec::new()),
        Command::CreateUser { username } => {
            let user = SqliteUserRepository::new(&conn)
                .create_user(username)
                .map_err(|err| err.to_string())?;
            info!("event=cli_create_user module=cli status=ok user_id={}", user.id);
            Ok(vec![format!("user id={} username={}", user.id, user.username)])
        }
        Command::SeedNews { title, text } => {
            let news_id = SqliteNewsRepository::new(&conn)
                .create_news(&NewsDraft::new(title.as_str(), text.as_str()))
                .map_err(|err| err.to_string())?;
            info!("event=cli_seed_news module=cli status=ok news_id={news_id}");
            Ok(vec![format!("news id={news_id}")])
        }
        Command::ListNews => {
            let news = SqliteNewsRepository::new(&conn)
                .list_latest(LIST_NEWS_LIMIT)
                .map_err(|err| err.to_string())?;
            Ok(news
                .iter()
                .map(|item| format!("{}\t{}\t{}", item.id, item.date, item.title))
                .collect())
        }
    }
}

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("YA_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("error: {err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&invocation) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
