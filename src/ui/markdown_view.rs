//! Terminal presentation of a [`DisplayTree`]

use crate::markdown::{Block, DisplayTree, Inline};
use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const RULE_WIDTH: usize = 40;

/// Lays a rendered note out as styled terminal lines
pub fn to_lines(tree: &DisplayTree) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, block) in tree.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        push_block(block, "", &mut lines);
    }
    lines
}

fn push_block(block: &Block, indent: &str, lines: &mut Vec<Line<'static>>) {
    match block {
        Block::Heading { level, content } => {
            let style = match level {
                1 => Style::default()
                    .fg(Theme::LOVE)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                2 => Style::default().fg(Theme::IRIS).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Theme::FOAM).add_modifier(Modifier::BOLD),
            };
            push_inlines(content, style, indent, lines);
        }
        Block::Paragraph(content) => push_inlines(content, Theme::text(), indent, lines),
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match start {
                    Some(n) => format!("{}. ", n + i as u64),
                    None => "• ".to_string(),
                };
                let marker_span = Span::styled(
                    format!("{indent}{marker}"),
                    Style::default().fg(Theme::GOLD),
                );
                let nested_indent = format!("{indent}{}", " ".repeat(marker.chars().count()));
                let first_line = lines.len();

                for block in item {
                    push_block(block, &nested_indent, lines);
                }

                // the item's first line opens with its indent; the marker takes
                // that room and whatever the inner block drew after it stays
                match lines.get_mut(first_line) {
                    Some(line) => {
                        if let Some(lead) = line.spans.first_mut() {
                            let rest = lead
                                .content
                                .strip_prefix(nested_indent.as_str())
                                .unwrap_or(lead.content.as_ref())
                                .to_string();
                            lead.content = rest.into();
                        }
                        line.spans.insert(0, marker_span);
                    }
                    None => lines.push(Line::from(marker_span)),
                }
            }
        }
        Block::Quote(blocks) => {
            let quote_indent = format!("{indent}│ ");
            let first_line = lines.len();
            for block in blocks {
                push_block(block, &quote_indent, lines);
            }
            for line in lines.iter_mut().skip(first_line) {
                for span in line.spans.iter_mut().skip(1) {
                    span.style = span.style.add_modifier(Modifier::ITALIC);
                }
                if let Some(bar) = line.spans.first_mut() {
                    bar.style = Theme::muted();
                }
            }
        }
        Block::CodeBlock { language, code } => {
            if let Some(language) = language {
                lines.push(Line::from(vec![
                    Span::raw(indent.to_string()),
                    Span::styled(format!(" {language} "), Theme::muted()),
                ]));
            }
            for code_line in code.trim_end_matches('\n').lines() {
                lines.push(Line::from(vec![
                    Span::raw(indent.to_string()),
                    Span::styled(format!("  {code_line}"), Theme::code()),
                ]));
            }
        }
        Block::Rule => lines.push(Line::from(vec![
            Span::raw(indent.to_string()),
            Span::styled("─".repeat(RULE_WIDTH), Theme::muted()),
        ])),
    }
}

/// Every produced line starts with an indent span so list and quote
/// markers can be swapped in afterwards
fn push_inlines(inlines: &[Inline], base: Style, indent: &str, lines: &mut Vec<Line<'static>>) {
    let mut current = vec![Span::raw(indent.to_string())];
    collect_spans(inlines, base, indent, &mut current, lines);
    lines.push(Line::from(current));
}

fn collect_spans(
    inlines: &[Inline],
    style: Style,
    indent: &str,
    current: &mut Vec<Span<'static>>,
    lines: &mut Vec<Line<'static>>,
) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => current.push(Span::styled(text.clone(), style)),
            Inline::Code(code) => current.push(Span::styled(code.clone(), Theme::code())),
            Inline::Emphasis(children) => collect_spans(
                children,
                style.add_modifier(Modifier::ITALIC),
                indent,
                current,
                lines,
            ),
            Inline::Strong(children) => collect_spans(
                children,
                style.add_modifier(Modifier::BOLD),
                indent,
                current,
                lines,
            ),
            Inline::Strikethrough(children) => collect_spans(
                children,
                style.add_modifier(Modifier::CROSSED_OUT),
                indent,
                current,
                lines,
            ),
            Inline::Link { url, content } => {
                collect_spans(content, style.patch(Theme::link()), indent, current, lines);
                if Inline::plain_text(content) != *url {
                    current.push(Span::styled(format!(" ({url})"), Theme::muted()));
                }
            }
            Inline::Image { url, alt } => {
                let alt = Inline::plain_text(alt);
                let label = if alt.is_empty() { url.clone() } else { alt };
                current.push(Span::styled(format!("[image: {label}]"), Theme::muted()));
            }
            Inline::LineBreak => {
                let finished = std::mem::replace(current, vec![Span::raw(indent.to_string())]);
                lines.push(Line::from(finished));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{MarkdownRenderer, NoteRenderer};

    fn lines_for(content: &str) -> Vec<Line<'static>> {
        to_lines(&MarkdownRenderer.render(content))
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn bold_span_is_styled_bold() {
        let lines = lines_for("**bold** point");
        assert_eq!(lines.len(), 1);

        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .expect("bold span");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line_text(&lines[0]), "bold point");
    }

    #[test]
    fn list_items_get_markers() {
        let lines = lines_for("- one\n- two\n\n1. first\n2. second\n");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• one", "• two", "", "1. first", "2. second"]);
    }

    #[test]
    fn nested_list_keeps_both_markers() {
        let lines = lines_for("- - inner");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• • inner"]);

        let lines = lines_for("- outer\n  - inner\n");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• outer", "  • inner"]);
    }

    #[test]
    fn quote_inside_list_keeps_its_bar() {
        let lines = lines_for("- > quoted");
        assert_eq!(line_text(&lines[0]), "• │ quoted");

        let bar = lines[0]
            .spans
            .iter()
            .find(|s| s.content.contains('│'))
            .expect("quote bar");
        assert_eq!(bar.style, Theme::muted());
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let lines = lines_for("# Title\n\nBody text");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["Title", "", "Body text"]);
    }

    #[test]
    fn links_show_destination() {
        let lines = lines_for("[docs](https://example.com)");
        assert_eq!(line_text(&lines[0]), "docs (https://example.com)");
    }

    #[test]
    fn hard_breaks_split_lines() {
        let lines = lines_for("one  \ntwo");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn quotes_are_prefixed() {
        let lines = lines_for("> wise words");
        assert_eq!(line_text(&lines[0]), "│ wise words");
    }
}
