use crate::markdown::NoteRenderer;
use crate::models::{Note, Profile};
use crate::notes::{NotesError, NotesViewModel};
use crate::ui::{components, notes_page, profile_page};
use ratatui::Frame;
use tracing::debug;

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Profile,
    Notes,
}

impl AppState {
    pub fn title(self) -> &'static str {
        match self {
            AppState::Profile => "Profile",
            AppState::Notes => "Notes",
        }
    }

    pub fn all() -> [AppState; 2] {
        [AppState::Profile, AppState::Notes]
    }

    pub fn index(self) -> usize {
        match self {
            AppState::Profile => 0,
            AppState::Notes => 1,
        }
    }
}

/// An action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationState {
    None,
    DeleteNote { id: String, title: String },
}

/// Main application state container
///
/// Holds the notes view-model plus everything that only matters to the
/// terminal presentation: which screen is up, which note is highlighted,
/// scroll offsets and the status line.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub notes: NotesViewModel,
    pub renderer: Box<dyn NoteRenderer>,
    pub profile: Profile,
    pub selected_note: usize,
    pub content_scroll: u16,
    pub profile_scroll: u16,
    pub confirmation_state: ConfirmationState,
    pub show_help: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(notes: NotesViewModel, renderer: Box<dyn NoteRenderer>, profile: Profile) -> Self {
        Self {
            state: AppState::default(),
            notes,
            renderer,
            profile,
            selected_note: 0,
            content_scroll: 0,
            profile_scroll: 0,
            confirmation_state: ConfirmationState::None,
            show_help: false,
            error_message: None,
            success_message: None,
        }
    }

    pub fn navigate_to(&mut self, state: AppState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "navigate");
            self.state = state;
            self.clear_messages();
        }
    }

    pub fn switch_page(&mut self) {
        let next = match self.state {
            AppState::Profile => AppState::Notes,
            AppState::Notes => AppState::Profile,
        };
        self.navigate_to(next);
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.notes().get(self.selected_note)
    }

    pub fn next_note(&mut self) {
        let count = self.notes.notes().len();
        if count > 0 {
            self.selected_note = (self.selected_note + 1) % count;
            self.content_scroll = 0;
        }
    }

    pub fn previous_note(&mut self) {
        let count = self.notes.notes().len();
        if count > 0 {
            self.selected_note = (self.selected_note + count - 1) % count;
            self.content_scroll = 0;
        }
    }

    pub fn scroll_content_down(&mut self) {
        self.content_scroll = self.content_scroll.saturating_add(3);
    }

    pub fn scroll_content_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(3);
    }

    fn clamp_selection(&mut self) {
        self.selected_note = self
            .selected_note
            .min(self.notes.notes().len().saturating_sub(1));
    }

    pub fn begin_compose(&mut self) {
        self.clear_messages();
        self.notes.begin_compose();
    }

    pub fn cancel_compose(&mut self) {
        self.notes.cancel_compose();
        self.clear_messages();
    }

    /// Saves the open form as a new note and highlights it
    pub fn submit_compose(&mut self) {
        match self.notes.submit_draft() {
            Ok(note) => {
                let message = format!("Saved \"{}\"", note.title);
                self.selected_note = self.notes.notes().len() - 1;
                self.content_scroll = 0;
                self.set_success_message(message);
            }
            Err(NotesError::Compose(e)) => self.set_error_message(e.to_string()),
            Err(e) => {
                // the note is kept for this session even though the store missed it
                self.selected_note = self.notes.notes().len().saturating_sub(1);
                self.set_error_message(e.to_string());
            }
        }
    }

    pub fn request_delete_confirmation(&mut self) {
        if let Some(note) = self.selected_note() {
            self.confirmation_state = ConfirmationState::DeleteNote {
                id: note.id.clone(),
                title: note.title.clone(),
            };
        }
    }

    pub fn has_pending_action(&self) -> bool {
        self.confirmation_state != ConfirmationState::None
    }

    pub fn confirm_pending_action(&mut self) {
        let pending = std::mem::replace(&mut self.confirmation_state, ConfirmationState::None);
        if let ConfirmationState::DeleteNote { id, title } = pending {
            match self.notes.delete(&id) {
                Ok(_) => self.set_success_message(format!("Deleted \"{title}\"")),
                Err(e) => self.set_error_message(format!("Failed to save notes: {e}")),
            }
            self.clamp_selection();
            self.content_scroll = 0;
        }
    }

    pub fn cancel_pending_action(&mut self) {
        self.confirmation_state = ConfirmationState::None;
    }

    pub fn set_error_message(&mut self, message: String) {
        self.error_message = Some(message);
        self.success_message = None;
    }

    pub fn set_success_message(&mut self, message: String) {
        self.success_message = Some(message);
        self.error_message = None;
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    /// Renders the current screen plus any open overlay
    pub fn render(&self, frame: &mut Frame) {
        let content_area = components::render_page_frame(frame, self);

        match self.state {
            AppState::Profile => profile_page::render(frame, content_area, self),
            AppState::Notes => notes_page::render(frame, content_area, self),
        }

        if self.has_pending_action() {
            components::render_confirmation(frame, self);
        }
        if self.show_help {
            components::render_help(frame, self);
        }
    }
}

/// App over an in-memory store, for tests across the crate
#[cfg(test)]
pub(crate) fn test_app(backend: &crate::models::MemoryKeyValueStore) -> App {
    use crate::markdown::MarkdownRenderer;
    use crate::models::note::DEFAULT_DATE_FORMAT;
    use crate::models::{NoteStore, StorageKey};

    let store = NoteStore::new(Box::new(backend.clone()), StorageKey::default());
    let notes = NotesViewModel::initialize(store, DEFAULT_DATE_FORMAT);
    App::new(notes, Box::new(MarkdownRenderer), Profile::default())
}
