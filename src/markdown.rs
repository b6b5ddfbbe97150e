//! Note content rendering
//!
//! Note bodies are Markdown. They are never interpreted as anything but
//! display structure: raw HTML comes through as literal text. The
//! [`NoteRenderer`] trait keeps the notes code independent of the dialect;
//! [`MarkdownRenderer`] is the `pulldown-cmark` backed default.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt::Debug;

/// Structured display content produced from a note body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTree {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    List { start: Option<u64>, items: Vec<Vec<Block>> },
    Quote(Vec<Block>),
    CodeBlock { language: Option<String>, code: String },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { url: String, content: Vec<Inline> },
    Image { url: String, alt: Vec<Inline> },
    LineBreak,
}

impl DisplayTree {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Concatenated text of every block, one block per line
    pub fn plain_text(&self) -> String {
        let mut out = Vec::new();
        for block in &self.blocks {
            collect_block_text(block, &mut out);
        }
        out.join("\n")
    }

    /// First non-blank line of the plain text, cut to `max_chars`
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.plain_text();
        let first_line = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("");
        if first_line.chars().count() > max_chars {
            let cut: String = first_line.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{cut}…")
        } else {
            first_line.to_string()
        }
    }
}

impl Inline {
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) | Inline::Code(text) => out.push_str(text),
                Inline::Emphasis(children)
                | Inline::Strong(children)
                | Inline::Strikethrough(children)
                | Inline::Link {
                    content: children, ..
                }
                | Inline::Image { alt: children, .. } => out.push_str(&Self::plain_text(children)),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }
}

fn collect_block_text(block: &Block, out: &mut Vec<String>) {
    match block {
        Block::Heading { content, .. } | Block::Paragraph(content) => {
            out.push(Inline::plain_text(content));
        }
        Block::List { items, .. } => {
            for item in items {
                for block in item {
                    collect_block_text(block, out);
                }
            }
        }
        Block::Quote(blocks) => {
            for block in blocks {
                collect_block_text(block, out);
            }
        }
        Block::CodeBlock { code, .. } => out.push(code.trim_end().to_string()),
        Block::Rule => {}
    }
}

/// Turns raw note content into display structure
pub trait NoteRenderer: Debug {
    fn render(&self, content: &str) -> DisplayTree;
}

/// CommonMark renderer with strikethrough and task list extensions
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl NoteRenderer for MarkdownRenderer {
    fn render(&self, content: &str) -> DisplayTree {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(content, options) {
            builder.handle(event);
        }
        builder.finish()
    }
}

#[derive(Debug)]
enum Container {
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Item(Vec<Block>),
}

#[derive(Debug)]
enum Leaf {
    Paragraph(Vec<Inline>),
    Heading(u8, Vec<Inline>),
}

#[derive(Debug)]
enum SpanKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Image(String),
}

#[derive(Debug)]
struct OpenSpan {
    kind: SpanKind,
    children: Vec<Inline>,
}

impl OpenSpan {
    fn close(self) -> Inline {
        match self.kind {
            SpanKind::Emphasis => Inline::Emphasis(self.children),
            SpanKind::Strong => Inline::Strong(self.children),
            SpanKind::Strikethrough => Inline::Strikethrough(self.children),
            SpanKind::Link(url) => Inline::Link {
                url,
                content: self.children,
            },
            SpanKind::Image(url) => Inline::Image {
                url,
                alt: self.children,
            },
        }
    }
}

/// Folds the flat `pulldown-cmark` event stream into a [`DisplayTree`]
///
/// Tight list items carry their text without a surrounding paragraph, so an
/// implicit paragraph is opened whenever inline content shows up with no
/// leaf block to hold it.
#[derive(Debug, Default)]
struct TreeBuilder {
    root: Vec<Block>,
    containers: Vec<Container>,
    leaf: Option<Leaf>,
    spans: Vec<OpenSpan>,
    code: Option<(Option<String>, String)>,
    html_line_ended: bool,
}

impl TreeBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&html);
                } else {
                    self.push_html(&html);
                }
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            Event::Rule => self.push_block(Block::Rule),
            Event::TaskListMarker(done) => self.push_text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.finish_leaf();
                self.leaf = Some(Leaf::Paragraph(Vec::new()));
            }
            Tag::Heading { level, .. } => {
                self.finish_leaf();
                self.leaf = Some(Leaf::Heading(heading_level(level), Vec::new()));
            }
            Tag::BlockQuote(_) => {
                self.finish_leaf();
                self.containers.push(Container::Quote(Vec::new()));
            }
            Tag::List(start) => {
                self.finish_leaf();
                self.containers.push(Container::List {
                    start,
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.finish_leaf();
                self.containers.push(Container::Item(Vec::new()));
            }
            Tag::CodeBlock(kind) => {
                self.finish_leaf();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                        Some(lang.trim().to_string())
                    }
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::Emphasis => self.open_span(SpanKind::Emphasis),
            Tag::Strong => self.open_span(SpanKind::Strong),
            Tag::Strikethrough => self.open_span(SpanKind::Strikethrough),
            Tag::Link { dest_url, .. } => self.open_span(SpanKind::Link(dest_url.to_string())),
            Tag::Image { dest_url, .. } => self.open_span(SpanKind::Image(dest_url.to_string())),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::HtmlBlock => self.finish_leaf(),
            TagEnd::BlockQuote(_) => {
                self.finish_leaf();
                if let Some(Container::Quote(blocks)) = self.containers.pop() {
                    self.push_block(Block::Quote(blocks));
                }
            }
            TagEnd::List(_) => {
                self.finish_leaf();
                if let Some(Container::List { start, items }) = self.containers.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            TagEnd::Item => {
                self.finish_leaf();
                if let Some(Container::Item(blocks)) = self.containers.pop() {
                    match self.containers.last_mut() {
                        Some(Container::List { items, .. }) => items.push(blocks),
                        _ => blocks.into_iter().for_each(|b| self.push_block(b)),
                    }
                }
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.push_block(Block::CodeBlock { language, code });
                }
            }
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => {
                if let Some(span) = self.spans.pop() {
                    self.push_inline(span.close());
                }
            }
            _ => {}
        }
    }

    fn open_span(&mut self, kind: SpanKind) {
        self.spans.push(OpenSpan {
            kind,
            children: Vec::new(),
        });
    }

    fn inline_sink(&mut self) -> &mut Vec<Inline> {
        if let Some(span) = self.spans.last_mut() {
            return &mut span.children;
        }

        match self.leaf.get_or_insert_with(|| Leaf::Paragraph(Vec::new())) {
            Leaf::Paragraph(content) | Leaf::Heading(_, content) => content,
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        self.inline_sink().push(inline);
    }

    fn push_text(&mut self, text: &str) {
        let sink = self.inline_sink();
        if let Some(Inline::Text(last)) = sink.last_mut() {
            last.push_str(text);
        } else {
            sink.push(Inline::Text(text.to_string()));
        }
    }

    /// Block HTML arrives one line per event; each source line stays a line
    fn push_html(&mut self, html: &str) {
        if self.html_line_ended {
            self.push_inline(Inline::LineBreak);
        }

        let mut lines = html.trim_end_matches('\n').split('\n');
        if let Some(first) = lines.next() {
            self.push_text(first);
        }
        for line in lines {
            self.push_inline(Inline::LineBreak);
            self.push_text(line);
        }
        self.html_line_ended = html.ends_with('\n');
    }

    fn finish_leaf(&mut self) {
        self.html_line_ended = false;

        // Unbalanced spans only happen on malformed streams; keep their text
        while let Some(span) = self.spans.pop() {
            let inline = span.close();
            self.inline_sink().push(inline);
        }

        if let Some(leaf) = self.leaf.take() {
            let block = match leaf {
                Leaf::Paragraph(content) => Block::Paragraph(content),
                Leaf::Heading(level, content) => Block::Heading { level, content },
            };
            self.push_block(block);
        }
    }

    fn push_block(&mut self, block: Block) {
        if self.leaf.is_some() {
            self.finish_leaf();
        }

        match self.containers.last_mut() {
            Some(Container::Quote(blocks) | Container::Item(blocks)) => blocks.push(block),
            Some(Container::List { items, .. }) => items.push(vec![block]),
            None => self.root.push(block),
        }
    }

    fn finish(mut self) -> DisplayTree {
        self.finish_leaf();
        if let Some((language, code)) = self.code.take() {
            self.push_block(Block::CodeBlock { language, code });
        }

        while let Some(container) = self.containers.pop() {
            let block = match container {
                Container::Quote(blocks) => Block::Quote(blocks),
                Container::List { start, items } => Block::List { start, items },
                Container::Item(blocks) => Block::List {
                    start: None,
                    items: vec![blocks],
                },
            };
            self.push_block(block);
        }

        DisplayTree { blocks: self.root }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(content: &str) -> DisplayTree {
        MarkdownRenderer.render(content)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn bold_text_becomes_strong_inline() {
        let tree = render("**bold** point");
        assert_eq!(
            tree.blocks,
            vec![Block::Paragraph(vec![
                Inline::Strong(vec![text("bold")]),
                text(" point"),
            ])]
        );
    }

    #[test]
    fn italic_and_strikethrough() {
        let tree = render("*soft* and ~~gone~~");
        assert_eq!(
            tree.blocks,
            vec![Block::Paragraph(vec![
                Inline::Emphasis(vec![text("soft")]),
                text(" and "),
                Inline::Strikethrough(vec![text("gone")]),
            ])]
        );
    }

    #[test]
    fn headings_keep_their_level() {
        let tree = render("# Title\n\n### Section");
        assert_eq!(
            tree.blocks,
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("Title")],
                },
                Block::Heading {
                    level: 3,
                    content: vec![text("Section")],
                },
            ]
        );
    }

    #[test]
    fn tight_list_items_get_paragraphs() {
        let tree = render("- one\n- **two**\n");
        assert_eq!(
            tree.blocks,
            vec![Block::List {
                start: None,
                items: vec![
                    vec![Block::Paragraph(vec![text("one")])],
                    vec![Block::Paragraph(vec![Inline::Strong(vec![text("two")])])],
                ],
            }]
        );
    }

    #[test]
    fn ordered_list_keeps_start_number() {
        let tree = render("3. three\n4. four\n");
        match &tree.blocks[0] {
            Block::List { start, items } => {
                assert_eq!(*start, Some(3));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn nested_list_sits_inside_item() {
        let tree = render("- outer\n  - inner\n");
        let Block::List { items, .. } = &tree.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0][0], Block::Paragraph(vec![text("outer")]));
        assert!(matches!(items[0][1], Block::List { .. }));
    }

    #[test]
    fn links_carry_destination() {
        let tree = render("see [docs](https://example.com/docs)");
        assert_eq!(
            tree.blocks,
            vec![Block::Paragraph(vec![
                text("see "),
                Inline::Link {
                    url: "https://example.com/docs".to_string(),
                    content: vec![text("docs")],
                },
            ])]
        );
    }

    #[test]
    fn fenced_code_block_keeps_language_and_body() {
        let tree = render("```rust\nfn main() {}\n```\n");
        assert_eq!(
            tree.blocks,
            vec![Block::CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}\n".to_string(),
            }]
        );
    }

    #[test]
    fn quote_and_rule() {
        let tree = render("> quoted\n\n---\n");
        assert_eq!(
            tree.blocks,
            vec![
                Block::Quote(vec![Block::Paragraph(vec![text("quoted")])]),
                Block::Rule,
            ]
        );
    }

    #[test]
    fn html_is_shown_as_text() {
        let tree = render("hi <script>alert(1)</script>");
        assert!(tree.plain_text().contains("<script>"));
        assert!(tree
            .blocks
            .iter()
            .all(|b| matches!(b, Block::Paragraph(_))));
    }

    #[test]
    fn html_block_keeps_its_lines() {
        let tree = render("<div>\n<b>x</b>\n</div>\n\nafter");
        assert_eq!(tree.blocks.len(), 2);
        assert_eq!(tree.plain_text(), "<div>\n<b>x</b>\n</div>\nafter");
    }

    #[test]
    fn preview_is_first_plain_line() {
        let tree = render("**bold** point\n\nmore");
        assert_eq!(tree.preview(100), "bold point");
        assert_eq!(tree.preview(5), "bold…");
        assert_eq!(render("").preview(10), "");
    }

    #[test]
    fn task_markers_render_as_text() {
        let tree = render("- [x] done\n- [ ] todo\n");
        assert_eq!(tree.plain_text(), "[x] done\n[ ] todo");
    }

    #[test]
    fn soft_breaks_join_lines() {
        let tree = render("first\nsecond");
        assert_eq!(tree.blocks, vec![Block::Paragraph(vec![text("first second")])]);
    }

    #[test]
    fn empty_content_renders_empty_tree() {
        assert!(render("").is_empty());
        assert!(render("   \n\n").is_empty());
    }
}
