//! Application settings shared by the notes and news surfaces.
//!
//! # Responsibility
//! - Hold tunables the applications read at request time (page size, slug
//!   limits, forbidden words, login entry point).
//! - Load them from TOML with defaults for every missing key.
//!
//! # Invariants
//! - A loaded `Settings` always passes `validate()`.

use crate::logging::default_log_level;
use crate::validation::word_filter::{WordFilter, BAD_WORDS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_NEWS_COUNT_ON_HOME_PAGE: usize = 10;
pub const DEFAULT_SLUG_MAX_LENGTH: usize = 100;
pub const DEFAULT_TITLE_MAX_LENGTH: usize = 100;
pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";

#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(&'static str),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read settings `{path}`: {source}"),
            Self::Parse(err) => write!(f, "failed to parse settings: {err}"),
            Self::Invalid(details) => write!(f, "invalid settings: {details}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// News items rendered on the home page.
    pub news_count_on_home_page: usize,
    pub slug_max_length: usize,
    pub title_max_length: usize,
    /// Case-sensitive substrings rejected in comment text.
    pub bad_words: Vec<String>,
    /// Login entry point for anonymous redirects.
    pub login_url: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_count_on_home_page: DEFAULT_NEWS_COUNT_ON_HOME_PAGE,
            slug_max_length: DEFAULT_SLUG_MAX_LENGTH,
            title_max_length: DEFAULT_TITLE_MAX_LENGTH,
            bad_words: BAD_WORDS.iter().map(|word| word.to_string()).collect(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.news_count_on_home_page == 0 {
            return Err(SettingsError::Invalid(
                "news_count_on_home_page must be positive",
            ));
        }
        if self.slug_max_length == 0 {
            return Err(SettingsError::Invalid("slug_max_length must be positive"));
        }
        if self.title_max_length == 0 {
            return Err(SettingsError::Invalid("title_max_length must be positive"));
        }
        if !self.login_url.starts_with('/') {
            return Err(SettingsError::Invalid(
                "login_url must be an absolute path",
            ));
        }
        Ok(())
    }

    pub fn word_filter(&self) -> WordFilter {
        WordFilter::new(self.bad_words.iter().cloned())
    }
}
