//! Page contexts handed to templates.
//!
//! Each variant carries exactly the data its template renders; markup is
//! out of scope for this crate.

use serde::Serialize;
use ya_core::{Comment, CommentForm, News, NewsDetail, Note, NoteForm, ValidationError};

/// Form state: submitted (or initial) values plus field errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState<F> {
    pub values: F,
    pub errors: Vec<ValidationError>,
}

impl<F> FormState<F> {
    pub fn blank(values: F) -> Self {
        Self {
            values,
            errors: Vec::new(),
        }
    }

    pub fn invalid(values: F, errors: Vec<ValidationError>) -> Self {
        Self { values, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "template", content = "context", rename_all = "snake_case")]
pub enum Page {
    NotesHome,
    NoteList(Vec<Note>),
    NoteDetail(Note),
    /// Add form when `note` is `None`, edit form otherwise.
    NoteForm {
        note: Option<Note>,
        form: FormState<NoteForm>,
    },
    NoteDelete(Note),
    Done,
    NewsHome(Vec<News>),
    /// `form` is present only for logged-in users.
    NewsDetail {
        detail: NewsDetail,
        form: Option<FormState<CommentForm>>,
    },
    CommentEdit {
        comment: Comment,
        form: FormState<CommentForm>,
    },
    CommentDelete(Comment),
    Login,
    Logout,
    Signup,
}

#[cfg(test)]
mod tests {
    use super::{FormState, Page};
    use ya_core::{Note, NoteForm};

    #[test]
    fn page_serializes_with_template_name() {
        let note = Note {
            id: 1,
            title: "Заголовок".to_string(),
            text: "Текст".to_string(),
            slug: "zagolovok".to_string(),
            author_id: 2,
        };
        let page = Page::NoteForm {
            form: FormState::blank(NoteForm::from(&note)),
            note: Some(note),
        };

        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["template"], "note_form");
        assert_eq!(value["context"]["form"]["values"]["slug"], "zagolovok");
        assert_eq!(value["context"]["form"]["errors"], serde_json::json!([]));
    }

    #[test]
    fn list_pages_serialize_as_sequences() {
        let value = serde_json::to_value(Page::NoteList(Vec::new())).unwrap();
        assert_eq!(value["template"], "note_list");
        assert_eq!(value["context"], serde_json::json!([]));

        let value = serde_json::to_value(Page::Done).unwrap();
        assert_eq!(value["template"], "done");
    }
}
