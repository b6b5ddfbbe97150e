//! Keyboard Input Handling Module
//!
//! Translates terminal key events into application state changes. Overlays
//! take input first (compose form, confirmation, help), then global keys,
//! then the keys of the current screen.

use crate::app::{App, AppState};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Main keyboard event handler and dispatcher
///
/// Returns `true` when the application should quit.
pub fn handle_key_events(key: KeyEvent, app: &mut App) -> bool {
    // Windows reports releases as well as presses
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if app.notes.is_composing() {
        handle_compose_keys(key, app);
        return false;
    }

    if app.has_pending_action() {
        handle_confirmation_keys(key, app);
        return false;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => true,

        KeyCode::Char('?') => {
            app.clear_messages();
            app.show_help = true;
            false
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.switch_page();
            false
        }
        KeyCode::Char('1') => {
            app.navigate_to(AppState::Profile);
            false
        }
        KeyCode::Char('2') => {
            app.navigate_to(AppState::Notes);
            false
        }
        KeyCode::Esc => {
            app.clear_messages();
            false
        }

        _ => match app.state {
            AppState::Profile => handle_profile_keys(key, app),
            AppState::Notes => handle_notes_keys(key, app),
        },
    }
}

/// Handles text entry while the new-note form is open
fn handle_compose_keys(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.cancel_compose(),
        KeyCode::Char('s') if ctrl => app.submit_compose(),
        _ => {
            let Some(form) = app.notes.compose_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
                KeyCode::Enter => form.newline(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !ctrl => form.insert_char(c),
                _ => {}
            }
        }
    }
}

fn handle_confirmation_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_pending_action(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_pending_action(),
        _ => {}
    }
}

fn handle_profile_keys(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            app.profile_scroll = app.profile_scroll.saturating_add(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.profile_scroll = app.profile_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.profile_scroll = app.profile_scroll.saturating_add(10),
        KeyCode::PageUp => app.profile_scroll = app.profile_scroll.saturating_sub(10),
        KeyCode::Home => app.profile_scroll = 0,
        _ => {}
    }
    false
}

fn handle_notes_keys(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('a') => app.begin_compose(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_confirmation(),
        KeyCode::Down | KeyCode::Char('j') => app.next_note(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_note(),
        KeyCode::PageDown => app.scroll_content_down(),
        KeyCode::PageUp => app.scroll_content_up(),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use crate::models::{MemoryKeyValueStore, StorageKey};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_events(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), app)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn writing_a_note_from_the_keyboard() {
        let backend = MemoryKeyValueStore::new();
        let mut app = test_app(&backend);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state, AppState::Notes);

        press(&mut app, KeyCode::Char('n'));
        assert!(app.notes.is_composing());

        // q and Tab are text while the form is open
        type_text(&mut app, "Idea q");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "**bold** point");
        assert!(!ctrl(&mut app, 's'));

        assert!(!app.notes.is_composing());
        assert_eq!(app.notes.notes().len(), 1);
        assert_eq!(app.notes.notes()[0].title, "Idea q");
        assert_eq!(app.notes.notes()[0].content, "**bold** point");
        assert!(backend.raw(&StorageKey::default()).unwrap().contains("Idea q"));
    }

    #[test]
    fn escape_discards_the_form() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);

        assert!(!app.notes.is_composing());
        assert!(app.notes.notes().is_empty());

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.notes.compose().unwrap().title, "");
    }

    #[test]
    fn saving_an_empty_form_keeps_it_open() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Only a title");
        ctrl(&mut app, 's');

        assert!(app.notes.is_composing());
        assert!(app.notes.notes().is_empty());
        assert!(app.error_message.is_some());
    }

    #[test]
    fn enter_moves_to_content_then_breaks_lines() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "T");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "bx");
        press(&mut app, KeyCode::Backspace);

        let form = app.notes.compose().unwrap();
        assert_eq!(form.title, "T");
        assert_eq!(form.content, "a\nb");
    }

    #[test]
    fn delete_asks_before_removing() {
        let backend = MemoryKeyValueStore::new();
        let mut app = test_app(&backend);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Doomed");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "bye");
        ctrl(&mut app, 's');

        press(&mut app, KeyCode::Char('d'));
        assert!(app.has_pending_action());
        // quitting is not possible while the question is open
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.notes.notes().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.notes.notes().is_empty());
        assert!(
            backend
                .raw(&StorageKey::default())
                .unwrap()
                .contains(r#""notes": []"#)
        );
    }

    #[test]
    fn help_toggles_and_blocks_other_keys() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state, AppState::Profile);

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn quit_keys() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(ctrl(&mut app, 'c'));
        assert!(!press(&mut app, KeyCode::Char('x')));
    }

    #[test]
    fn profile_scrolls_without_going_negative() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.profile_scroll, 0);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.profile_scroll, 2);
    }
}
