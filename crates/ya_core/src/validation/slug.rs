//! Note slug assignment.
//!
//! # Invariants
//! - A caller-supplied slug that collides with another note is rejected with
//!   `ValidationKind::Duplicate`; the note being edited is not a collision.
//! - A derived slug is `slugify(title)` truncated to the maximum length and is
//!   not re-checked for uniqueness here. The `notes.slug` UNIQUE constraint
//!   is the backstop for that path.

use crate::model::note::NoteId;
use crate::validation::translit::slugify;
use crate::validation::{max_length, ValidationError, ValidationKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suffix appended to the colliding slug in the duplicate error message.
pub const SLUG_WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

const SLUG_FIELD: &str = "slug";
const INVALID_SLUG_MESSAGE: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";
const UNDERIVABLE_SLUG_MESSAGE: &str =
    "Не удалось сформировать slug из заголовка, укажите его вручную.";

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Lookup of slugs already present in the store.
pub trait SlugIndex {
    type Error;

    /// Whether `slug` belongs to a note other than `exclude`.
    fn slug_taken(&self, slug: &str, exclude: Option<NoteId>) -> Result<bool, Self::Error>;
}

/// How the final slug was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugSource {
    Requested,
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedSlug {
    pub slug: String,
    pub source: SlugSource,
}

/// Slug assignment failure: a field error or a failed index lookup.
#[derive(Debug)]
pub enum SlugError<E> {
    Invalid(ValidationError),
    Lookup(E),
}

impl<E: Display> Display for SlugError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Lookup(err) => write!(f, "slug lookup failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for SlugError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Lookup(err) => Some(err),
        }
    }
}

impl<E> From<ValidationError> for SlugError<E> {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Error reported when `slug` is already used by another note.
pub fn duplicate_slug_error(slug: &str) -> ValidationError {
    ValidationError::new(
        SLUG_FIELD,
        ValidationKind::Duplicate,
        format!("{slug}{SLUG_WARNING}"),
    )
}

/// Derives a slug from a title: transliterate, slugify, truncate.
pub fn derive_slug(title: &str, max_chars: usize) -> String {
    slugify(title).chars().take(max_chars).collect()
}

/// Checks format and length of a caller-supplied slug.
pub fn validate_requested_slug(slug: &str, max_chars: usize) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(ValidationError::new(
            SLUG_FIELD,
            ValidationKind::InvalidSlug,
            INVALID_SLUG_MESSAGE,
        ));
    }
    max_length(SLUG_FIELD, slug, max_chars)
}

/// Resolves the slug for a note being created (`exclude = None`) or edited
/// (`exclude = Some(id)`).
///
/// A non-blank `requested` slug is validated and checked against `index`.
/// A blank one is derived from `title` without a uniqueness check.
pub fn assign_slug<I: SlugIndex>(
    index: &I,
    title: &str,
    requested: &str,
    exclude: Option<NoteId>,
    max_chars: usize,
) -> Result<AssignedSlug, SlugError<I::Error>> {
    let requested = requested.trim();
    if requested.is_empty() {
        let slug = derive_slug(title, max_chars);
        if slug.is_empty() {
            return Err(ValidationError::new(
                SLUG_FIELD,
                ValidationKind::InvalidSlug,
                UNDERIVABLE_SLUG_MESSAGE,
            )
            .into());
        }
        return Ok(AssignedSlug {
            slug,
            source: SlugSource::Derived,
        });
    }

    validate_requested_slug(requested, max_chars)?;
    if index
        .slug_taken(requested, exclude)
        .map_err(SlugError::Lookup)?
    {
        return Err(duplicate_slug_error(requested).into());
    }

    Ok(AssignedSlug {
        slug: requested.to_string(),
        source: SlugSource::Requested,
    })
}
