//! Notes view-model
//!
//! Owns the in-memory note list for one session and routes every mutation
//! through the [`NoteStore`], so that the stored collection always matches
//! what is on screen once an operation returns.

pub mod compose;

use crate::models::{Note, NoteStore, StorageError};
use chrono::Local;
use thiserror::Error;
use tracing::{error, info};

pub use compose::{ComposeError, ComposeField, ComposeForm, Submission};

#[derive(Debug, Error)]
pub enum NotesError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Failed to save notes: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct NotesViewModel {
    store: NoteStore,
    notes: Vec<Note>,
    compose: Option<ComposeForm>,
    date_format: String,
}

impl NotesViewModel {
    /// Starts a session from whatever the store currently holds
    pub fn initialize(store: NoteStore, date_format: impl Into<String>) -> Self {
        let notes = store.load();
        info!(
            count = notes.len(),
            key = %store.key(),
            location = %store.location(),
            "notes loaded"
        );

        Self {
            store,
            notes,
            compose: None,
            date_format: date_format.into(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Looks a note up by id, then exact title, then partial title
    pub fn find(&self, id_or_title: &str) -> Option<&Note> {
        self.get(id_or_title)
            .or_else(|| self.notes.iter().find(|n| n.title_matches(id_or_title)))
            .or_else(|| self.notes.iter().find(|n| n.title_contains(id_or_title)))
    }

    /// Notes named by exact id, or else by case-insensitive exact title
    ///
    /// Destructive commands go through this rather than [`Self::find`], so a
    /// partial title never picks a note on its own.
    pub fn find_exact(&self, id_or_title: &str) -> Vec<&Note> {
        if let Some(note) = self.get(id_or_title) {
            return vec![note];
        }
        self.notes
            .iter()
            .filter(|n| n.title_matches(id_or_title))
            .collect()
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    pub fn is_composing(&self) -> bool {
        self.compose.is_some()
    }

    pub fn compose(&self) -> Option<&ComposeForm> {
        self.compose.as_ref()
    }

    pub fn compose_mut(&mut self) -> Option<&mut ComposeForm> {
        self.compose.as_mut()
    }

    /// Opens an empty new-note form, discarding any previous drafts
    pub fn begin_compose(&mut self) {
        self.compose = Some(ComposeForm::new());
    }

    /// Closes the form without persisting anything
    pub fn cancel_compose(&mut self) {
        self.compose = None;
    }

    /// Appends a new note and persists the whole collection
    ///
    /// The form is closed even if saving fails; the note stays in memory and
    /// the error is handed back for the caller to report.
    pub fn submit(&mut self, submission: Submission) -> Result<&Note, StorageError> {
        let (title, content) = submission.into_parts();
        let note = Note::new(
            self.fresh_id(),
            title,
            content,
            Local::now(),
            &self.date_format,
        );
        info!(id = %note.id, title = %note.title, "note created");

        self.notes.push(note);
        self.compose = None;

        let saved = self.persist();
        saved.map(|()| &self.notes[self.notes.len() - 1])
    }

    /// Validates the open form and submits it
    ///
    /// On a validation failure the form stays open with its drafts intact.
    pub fn submit_draft(&mut self) -> Result<&Note, NotesError> {
        let submission = match &self.compose {
            Some(form) => form.submission()?,
            None => ComposeForm::new().submission()?,
        };
        Ok(self.submit(submission)?)
    }

    /// Removes the note with `id`, if present, and persists the collection
    ///
    /// Returns whether a note was removed. Unknown ids are not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        let removed = self.notes.len() != before;
        if removed {
            info!(id, "note deleted");
        }

        self.persist()?;
        Ok(removed)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.store.save(&self.notes).inspect_err(|e| {
            error!(error = %e, location = %self.store.location(), "failed to save notes");
        })
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Note::generate_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
