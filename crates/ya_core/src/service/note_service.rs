//! Note use-case service.
//!
//! # Responsibility
//! - Create/update/delete/get/list notes for the requesting user only.
//! - Clean note form input and resolve the slug.
//!
//! # Invariants
//! - List results contain only the requester's notes, in creation order.
//! - A foreign or missing slug is `ServiceError::NotFound`.
//! - Updates replace title, text and slug in full.

use crate::model::note::{Note, NoteDraft, NoteForm, NoteId};
use crate::policy::{list_scope, Action, Requester};
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::{authorize, ServiceError};
use crate::settings::Settings;
use crate::validation::slug::{assign_slug, SlugError, SlugIndex};
use crate::validation::{max_length, require};
use log::info;

const MODULE: &str = "notes";

/// Field limits applied to note forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLimits {
    pub title_max_length: usize,
    pub slug_max_length: usize,
}

impl From<&Settings> for NoteLimits {
    fn from(settings: &Settings) -> Self {
        Self {
            title_max_length: settings.title_max_length,
            slug_max_length: settings.slug_max_length,
        }
    }
}

impl Default for NoteLimits {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R> {
    repo: R,
    limits: NoteLimits,
}

impl<R> NoteService<R>
where
    R: NoteRepository + SlugIndex<Error = RepoError>,
{
    pub fn new(repo: R, limits: NoteLimits) -> Self {
        Self { repo, limits }
    }

    /// Lists the requester's notes ordered by id.
    pub fn list_notes(&self, requester: Requester) -> Result<Vec<Note>, ServiceError> {
        authorize::<Note>(MODULE, requester, None, Action::List)?;
        let author_id = list_scope(requester).ok_or(ServiceError::LoginRequired)?;
        Ok(self.repo.list_notes_by_author(author_id)?)
    }

    /// Checks that the requester may open the create form.
    pub fn ensure_can_create(&self, requester: Requester) -> Result<(), ServiceError> {
        authorize::<Note>(MODULE, requester, None, Action::Create)
    }

    /// Creates a note owned by the requester.
    ///
    /// A blank `form.slug` is derived from the title.
    pub fn create_note(&self, requester: Requester, form: &NoteForm) -> Result<Note, ServiceError> {
        authorize::<Note>(MODULE, requester, None, Action::Create)?;
        let author_id = requester.user_id().ok_or(ServiceError::LoginRequired)?;

        let draft = self.clean_form(form, None)?;
        let note_id = self.repo.create_note(author_id, &draft)?;
        info!("event=note_create module={MODULE} status=ok note_id={note_id} author_id={author_id}");

        self.read_back(note_id, "created note not found in read-back")
    }

    /// Returns one of the requester's notes by slug.
    pub fn get_note(
        &self,
        requester: Requester,
        slug: &str,
        action: Action,
    ) -> Result<Note, ServiceError> {
        let note = self.repo.get_note_by_slug(slug)?;
        authorize(MODULE, requester, note.as_ref(), action)?;
        note.ok_or(ServiceError::NotFound)
    }

    /// Replaces the content of one of the requester's notes.
    pub fn update_note(
        &self,
        requester: Requester,
        slug: &str,
        form: &NoteForm,
    ) -> Result<Note, ServiceError> {
        let note = self.get_note(requester, slug, Action::Edit)?;
        let draft = self.clean_form(form, Some(note.id))?;
        self.repo.update_note(note.id, &draft)?;
        info!(
            "event=note_update module={MODULE} status=ok note_id={} slug_changed={}",
            note.id,
            note.slug != draft.slug
        );

        self.read_back(note.id, "updated note not found in read-back")
    }

    /// Deletes one of the requester's notes and returns it.
    pub fn delete_note(&self, requester: Requester, slug: &str) -> Result<Note, ServiceError> {
        let note = self.get_note(requester, slug, Action::Delete)?;
        self.repo.delete_note(note.id)?;
        info!("event=note_delete module={MODULE} status=ok note_id={}", note.id);
        Ok(note)
    }

    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }

    fn read_back(&self, note_id: NoteId, details: &'static str) -> Result<Note, ServiceError> {
        self.repo
            .get_note(note_id)?
            .ok_or(ServiceError::InconsistentState(details))
    }

    /// Validates every field and resolves the slug.
    ///
    /// All field errors are reported together. The slug is only derived when
    /// a title is present.
    fn clean_form(&self, form: &NoteForm, exclude: Option<NoteId>) -> Result<NoteDraft, ServiceError> {
        let title = form.title.trim();
        let text = form.text.trim();
        let mut errors = Vec::new();

        if let Err(err) = require("title", title)
            .and_then(|()| max_length("title", title, self.limits.title_max_length))
        {
            errors.push(err);
        }
        if let Err(err) = require("text", text) {
            errors.push(err);
        }

        let slug = if title.is_empty() && form.slug.trim().is_empty() {
            None
        } else {
            match assign_slug(
                &self.repo,
                title,
                &form.slug,
                exclude,
                self.limits.slug_max_length,
            ) {
                Ok(assigned) => Some(assigned.slug),
                Err(SlugError::Invalid(err)) => {
                    errors.push(err);
                    None
                }
                Err(SlugError::Lookup(err)) => return Err(err.into()),
            }
        };

        match slug {
            Some(slug) if errors.is_empty() => Ok(NoteDraft {
                title: title.to_string(),
                text: text.to_string(),
                slug,
            }),
            _ => {
                info!(
                    "event=note_validate module={MODULE} status=rejected error_count={}",
                    errors.len()
                );
                Err(ServiceError::Validation(errors))
            }
        }
    }
}
