use crate::app::App;
use crate::models::Profile;
use crate::ui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget, Wrap},
};

/// Renders the static biography screen
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let profile = &app.profile;

    let chunks = Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).split(area);

    let header = vec![
        Line::from(Span::styled(
            profile.name.clone(),
            Style::default().fg(Theme::ROSE).bold(),
        )),
        Line::from(Span::styled(profile.tagline.clone(), Theme::muted())),
        link_line(profile),
    ];

    Paragraph::new(header)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Rounded)
                .style(Theme::border()),
        )
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(body_lines(profile))
        .wrap(Wrap { trim: false })
        .scroll((app.profile_scroll, 0))
        .block(Block::default().padding(Padding::horizontal(2)))
        .render(chunks[1], frame.buffer_mut());
}

fn link_line(profile: &Profile) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, link) in profile.links.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Theme::muted()));
        }
        spans.push(Span::styled(
            format!("{}: ", link.label),
            Style::default().fg(Theme::SUBTLE),
        ));
        spans.push(Span::styled(link.url.clone(), Theme::link()));
    }
    Line::from(spans)
}

fn section_heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(format!("▍{title}"), Theme::section_title()))
}

/// Sections in page order: About, Projects, Publications
fn body_lines(profile: &Profile) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default(), section_heading("About Me")];
    for paragraph in &profile.about {
        lines.push(Line::from(Span::styled(paragraph.clone(), Theme::text())));
        lines.push(Line::default());
    }

    lines.push(section_heading("Projects"));
    for project in &profile.projects {
        lines.push(Line::from(Span::styled(
            format!("  {}", project.title),
            Style::default().fg(Theme::GOLD).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", project.description),
            Theme::text(),
        )));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(project.link.clone(), Theme::link()),
        ]));
        lines.push(Line::default());
    }

    lines.push(section_heading("Publications"));
    for publication in &profile.publications {
        lines.push(Line::from(Span::styled(
            format!("  {}", publication.title),
            Style::default().fg(Theme::FOAM).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", publication.citation()),
            Theme::muted().add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn body_lists_every_section() {
        let profile = Profile::default();
        let text = text_of(&body_lines(&profile));

        let about = text.iter().position(|l| l == "▍About Me").unwrap();
        let projects = text.iter().position(|l| l == "▍Projects").unwrap();
        let publications = text.iter().position(|l| l == "▍Publications").unwrap();
        assert!(about < projects && projects < publications);

        for project in &profile.projects {
            assert!(text.contains(&format!("  {}", project.title)));
        }
        for publication in &profile.publications {
            assert!(text.contains(&format!("    {}", publication.citation())));
        }
    }

    #[test]
    fn links_are_joined_on_one_line() {
        let profile = Profile::default();
        let text = text_of(&[link_line(&profile)]).remove(0);
        for link in &profile.links {
            assert!(text.contains(&link.url));
        }
    }
}
