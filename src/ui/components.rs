//! UI Components and Layout Module
//!
//! Pieces shared by every screen: the outer frame with its tab header, the
//! bottom navigation bar with context-aware shortcuts, the status line, and
//! the popups (delete confirmation, help).

use crate::app::{App, AppState, ConfirmationState};
use crate::ui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Tabs, Widget, Wrap},
};

/// Draws the chrome around a screen and returns the area left for content
pub fn render_page_frame(frame: &mut Frame, app: &App) -> Rect {
    let main_area = frame.area();

    let block = Block::bordered()
        .title(format!(" {} ", app.profile.name))
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .style(Theme::border());

    let inner_area = block.inner(main_area);
    block.render(main_area, frame.buffer_mut());

    let chunks = Layout::vertical([
        Constraint::Length(2), // Tabs
        Constraint::Fill(1),   // Page content
        Constraint::Length(1), // Status line
        Constraint::Length(3), // Bottom navigation bar
    ])
    .split(inner_area);

    render_tabs(frame, chunks[0], app);
    render_status_line(frame, chunks[2], app);
    render_bottom_bar(frame, chunks[3], app);

    chunks[1]
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = AppState::all()
        .iter()
        .map(|state| match state {
            AppState::Notes => format!("{} ({})", state.title(), app.notes.notes().len()),
            _ => state.title().to_string(),
        })
        .collect();

    Tabs::new(titles)
        .select(app.state.index())
        .style(Style::default().fg(Theme::SUBTLE))
        .highlight_style(Style::default().fg(Theme::LOVE).bold())
        .divider("│")
        .padding(" ", " ")
        .render(area, frame.buffer_mut());
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(error) = &app.error_message {
        Line::from(Span::styled(format!(" ✗ {error}"), Style::default().fg(Theme::LOVE)))
    } else if let Some(success) = &app.success_message {
        Line::from(Span::styled(format!(" ✓ {success}"), Style::default().fg(Theme::FOAM)))
    } else {
        Line::default()
    };

    Paragraph::new(line).render(area, frame.buffer_mut());
}

/// Renders the bottom navigation bar with breadcrumbs and keyboard shortcuts
pub fn render_bottom_bar(frame: &mut Frame, area: Rect, app: &App) {
    let navbar_chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)]).split(area);

    let left_content = Paragraph::new(breadcrumbs(app))
        .alignment(Alignment::Left)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .style(Theme::border()),
        );

    let right_content = Paragraph::new(context_shortcuts(app))
        .alignment(Alignment::Right)
        .style(Theme::muted())
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .style(Theme::border()),
        );

    left_content.render(navbar_chunks[0], frame.buffer_mut());
    right_content.render(navbar_chunks[1], frame.buffer_mut());
}

fn context_shortcuts(app: &App) -> String {
    if app.has_pending_action() {
        return " [y] Confirm │ [n] Cancel ".to_string();
    }
    if app.notes.is_composing() {
        return " [Tab] Switch field │ [Ctrl+S] Save │ [Esc] Cancel ".to_string();
    }

    match app.state {
        AppState::Profile => " [Tab] Notes │ [↑↓] Scroll │ [?] Help │ [q] Quit ".to_string(),
        AppState::Notes if app.notes.notes().is_empty() => {
            " [n] New note │ [Tab] Profile │ [?] Help │ [q] Quit ".to_string()
        }
        AppState::Notes => {
            " [n] New │ [d] Delete │ [↑↓] Select │ [PgUp/PgDn] Scroll │ [?] Help │ [q] Quit "
                .to_string()
        }
    }
}

fn breadcrumbs(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled(" 󰋜 Home ", Style::default().fg(Theme::SUBTLE)),
        Span::styled(" ❯ ", Theme::muted()),
        Span::styled(
            format!(" {} ", app.state.title()),
            Style::default().fg(Theme::BASE).bg(Theme::IRIS),
        ),
    ];

    if app.state == AppState::Notes {
        let current = if app.notes.is_composing() {
            Some(" New note ".to_string())
        } else {
            app.selected_note().map(|n| format!(" {} ", n.title))
        };

        if let Some(label) = current {
            spans.push(Span::styled(" ❯ ", Theme::muted()));
            spans.push(Span::styled(
                label,
                Style::default().fg(Theme::BASE).bg(Theme::GOLD),
            ));
        }
    }

    Line::from(spans)
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Yes/no popup for the pending action
pub fn render_confirmation(frame: &mut Frame, app: &App) {
    let ConfirmationState::DeleteNote { title, .. } = &app.confirmation_state else {
        return;
    };

    let popup_area = centered_rect(frame.area(), 50, 7);
    Clear.render(popup_area, frame.buffer_mut());

    let content = vec![
        Line::default(),
        Line::from(vec![
            Span::styled("Delete ", Theme::text()),
            Span::styled(format!("\"{title}\""), Style::default().fg(Theme::GOLD).bold()),
            Span::styled("?", Theme::text()),
        ]),
        Line::default(),
        Line::from(Span::styled("[y] Delete   [n] Keep", Theme::muted())),
    ];

    Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(" Confirm ")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Double)
                .style(Style::default().fg(Theme::LOVE)),
        )
        .style(Style::default().bg(Theme::SURFACE))
        .render(popup_area, frame.buffer_mut());
}

/// Keybinding reference popup
pub fn render_help(frame: &mut Frame, _app: &App) {
    let bindings = [
        ("Tab", "Switch between Profile and Notes"),
        ("1 / 2", "Jump to Profile / Notes"),
        ("↑↓ or j/k", "Select note / scroll profile"),
        ("PgUp / PgDn", "Scroll the selected note"),
        ("n", "Write a new note"),
        ("d / Del", "Delete the selected note"),
        ("Ctrl+S", "Save the note being written"),
        ("Esc", "Cancel / close"),
        ("q / Ctrl+C", "Quit"),
    ];

    let mut content = vec![Line::default()];
    content.extend(bindings.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {key:<14}"), Style::default().fg(Theme::GOLD)),
            Span::styled(action.to_string(), Theme::text()),
        ])
    }));
    content.push(Line::default());
    content.push(Line::from(Span::styled(
        "  Note content supports Markdown: # headings, **bold**, *italic*, - lists, [links](url)",
        Theme::muted(),
    )));

    let popup_area = centered_rect(frame.area(), 70, content.len() as u16 + 2);
    Clear.render(popup_area, frame.buffer_mut());

    Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .title(" ? Help ")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::IRIS)),
        )
        .style(Style::default().bg(Theme::SURFACE))
        .render(popup_area, frame.buffer_mut());
}
