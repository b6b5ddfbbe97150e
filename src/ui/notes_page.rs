//! Notes screen
//!
//! Lays out the note list next to the rendered content of the highlighted
//! note. While the new-note form is open it is drawn as a popup above both.

use crate::app::App;
use crate::markdown::NoteRenderer;
use crate::models::Note;
use crate::notes::{ComposeField, ComposeForm};
use crate::ui::components::centered_rect;
use crate::ui::markdown_view;
use crate::ui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph, Widget, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

const PREVIEW_CHARS: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(area);

    render_note_list(frame, chunks[0], app);
    render_note_detail(frame, chunks[1], app);

    if let Some(form) = app.notes.compose() {
        render_compose(frame, area, form);
    }
}

fn render_note_list(frame: &mut Frame, area: Rect, app: &App) {
    let notes = app.notes.notes();
    let block = Block::bordered()
        .title(format!(" 󰠮 Notes ({}) ", notes.len()))
        .border_type(BorderType::Rounded)
        .style(Theme::border());

    if notes.is_empty() {
        Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled("No notes yet", Theme::muted())),
            Line::from(vec![
                Span::styled("Press ", Theme::muted()),
                Span::styled("n", Style::default().fg(Theme::GOLD).bold()),
                Span::styled(" to write one", Theme::muted()),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(block)
        .render(area, frame.buffer_mut());
        return;
    }

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| list_item(note, app.renderer.as_ref()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::selected())
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.selected_note));
    frame.render_stateful_widget(list, area, &mut state);
}

fn list_item(note: &Note, renderer: &dyn NoteRenderer) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(Span::styled(note.title.clone(), Theme::text().bold())),
        Line::from(Span::styled(note.date.clone(), Theme::muted())),
        Line::from(Span::styled(
            renderer.render(&note.content).preview(PREVIEW_CHARS),
            Style::default().fg(Theme::SUBTLE),
        )),
    ])
}

fn render_note_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Theme::border())
        .padding(Padding::horizontal(1));

    let Some(note) = app.selected_note() else {
        Paragraph::new(Line::from(Span::styled(
            "Select a note to read it here",
            Theme::muted(),
        )))
        .alignment(Alignment::Center)
        .block(block)
        .render(area, frame.buffer_mut());
        return;
    };

    let block = block.title(format!(" {} ", note.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).split(inner);

    let tree = app.renderer.render(&note.content);
    let words = tree.plain_text().split_whitespace().count();

    Paragraph::new(Line::from(vec![
        Span::styled(note.date.clone(), Style::default().fg(Theme::GOLD)),
        Span::styled("  ·  ", Theme::muted()),
        Span::styled(format!("{words} words"), Style::default().fg(Theme::SUBTLE)),
        Span::styled("  ·  ", Theme::muted()),
        Span::styled(note.id.clone(), Theme::muted()),
    ]))
    .render(chunks[0], frame.buffer_mut());

    let body = if tree.is_empty() {
        vec![Line::from(Span::styled("(nothing to show)", Theme::muted()))]
    } else {
        markdown_view::to_lines(&tree)
    };
    Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0))
        .render(chunks[1], frame.buffer_mut());
}

fn render_compose(frame: &mut Frame, area: Rect, form: &ComposeForm) {
    let popup_area = centered_rect(area, 80, 22);
    Clear.render(popup_area, frame.buffer_mut());

    let popup = Block::bordered()
        .title(" 󰏫 New Note ")
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::IRIS).bg(Theme::SURFACE));
    let inner = popup.inner(popup_area);
    popup.render(popup_area, frame.buffer_mut());

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let field_block = |title: &'static str, focused: bool| {
        let style = if focused {
            Style::default().fg(Theme::GOLD)
        } else {
            Theme::border()
        };
        Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .style(style)
    };

    let title_block = field_block(" Title ", form.focus == ComposeField::Title);
    let title_inner = title_block.inner(chunks[0]);
    Paragraph::new(form.title.as_str())
        .style(Theme::text())
        .block(title_block)
        .render(chunks[0], frame.buffer_mut());

    let content_block = field_block(" Content (Markdown) ", form.focus == ComposeField::Content);
    let content_inner = content_block.inner(chunks[1]);
    let content_lines = content_lines(&form.content);
    let scroll = (content_lines.len() as u16).saturating_sub(content_inner.height);
    Paragraph::new(content_lines.clone())
        .style(Theme::text())
        .scroll((scroll, 0))
        .block(content_block)
        .render(chunks[1], frame.buffer_mut());

    Paragraph::new("Tab: switch field • Enter: next line • Ctrl+S: save • Esc: cancel")
        .alignment(Alignment::Center)
        .style(Theme::muted().add_modifier(Modifier::ITALIC))
        .render(chunks[2], frame.buffer_mut());

    let cursor = match form.focus {
        ComposeField::Title => cursor_in(title_inner, form.title.width() as u16, 0),
        ComposeField::Content => {
            let last = content_lines.last().map_or(0, |l| l.width()) as u16;
            let row = (content_lines.len() as u16)
                .saturating_sub(1)
                .saturating_sub(scroll);
            cursor_in(content_inner, last, row)
        }
    };
    frame.set_cursor_position(cursor);
}

/// One entry per line of the draft, keeping a trailing empty line
fn content_lines(content: &str) -> Vec<Line<'static>> {
    content
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect()
}

fn cursor_in(area: Rect, column: u16, row: u16) -> Position {
    let max_x = area.x + area.width.saturating_sub(1);
    let max_y = area.y + area.height.saturating_sub(1);
    Position::new((area.x + column).min(max_x), (area.y + row).min(max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppState, test_app};
    use crate::models::MemoryKeyValueStore;
    use crate::notes::Submission;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_state_invites_a_first_note() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        app.navigate_to(AppState::Notes);
        assert!(screen_text(&app).contains("No notes yet"));
    }

    #[test]
    fn selected_note_is_rendered_as_markdown() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        app.notes
            .submit(Submission::new("Idea", "**bold** point").unwrap())
            .unwrap();
        app.navigate_to(AppState::Notes);

        let text = screen_text(&app);
        assert!(text.contains("Idea"));
        assert!(text.contains("bold point"));
        assert!(!text.contains("**bold**"));
        assert!(text.contains("2 words"));
    }

    #[test]
    fn compose_popup_shows_drafts() {
        let mut app = test_app(&MemoryKeyValueStore::new());
        app.navigate_to(AppState::Notes);
        app.begin_compose();
        app.notes.compose_mut().unwrap().title = "Draft title".to_string();

        let text = screen_text(&app);
        assert!(text.contains("New Note"));
        assert!(text.contains("Draft title"));
    }

    #[test]
    fn content_lines_keep_trailing_newline() {
        assert_eq!(content_lines("a\n").len(), 2);
        assert_eq!(content_lines("").len(), 1);
    }

    #[test]
    fn cursor_stays_inside_area() {
        let area = Rect::new(10, 5, 4, 2);
        assert_eq!(cursor_in(area, 2, 1), Position::new(12, 6));
        assert_eq!(cursor_in(area, 30, 9), Position::new(13, 6));
    }
}
