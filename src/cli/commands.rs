use crate::markdown::{Block, DisplayTree, Inline, NoteRenderer};
use crate::notes::{NotesViewModel, Submission};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

const PREVIEW_CHARS: usize = 50;

/// Lists every note in creation order
pub fn list_notes(
    notes: &NotesViewModel,
    renderer: &dyn NoteRenderer,
    out: &mut dyn Write,
) -> Result<()> {
    let bar = "┃".bright_magenta();

    if notes.notes().is_empty() {
        writeln!(out, "{}  No notes yet", bar)?;
        writeln!(out, "{}  Add one with: folio add <TITLE> <CONTENT>", bar)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}  {} ({})",
        bar,
        "NOTES".bright_green().bold(),
        notes.notes().len()
    )?;
    writeln!(out, "{}", "─".repeat(60).bright_magenta())?;

    for (idx, note) in notes.notes().iter().enumerate() {
        writeln!(
            out,
            "{}  {}. {} {}",
            bar,
            (idx + 1).to_string().yellow(),
            note.title.bright_white().bold(),
            note.date.dimmed()
        )?;
        let preview = renderer.render(&note.content).preview(PREVIEW_CHARS);
        if !preview.is_empty() {
            writeln!(out, "{}     {}", bar, preview.bright_black())?;
        }
    }

    Ok(())
}

/// Shows one note, found by id or title, with its content rendered
pub fn show_note(
    notes: &NotesViewModel,
    renderer: &dyn NoteRenderer,
    query: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(note) = notes.find(query) else {
        return not_found(notes, query, out);
    };

    let bar = "┃".bright_magenta();
    writeln!(out, "{}  {} {}", bar, "NOTE".bright_green().bold(), note.title.bold())?;
    writeln!(out, "{}", "─".repeat(60).bright_magenta())?;
    writeln!(out, "{}  {}: {}", bar, "Date".bright_blue(), note.date)?;
    writeln!(out, "{}  {}: {}", bar, "ID".bright_blue(), note.id.dimmed())?;
    writeln!(out, "{}", "─".repeat(60).bright_magenta())?;

    for line in tree_lines(&renderer.render(&note.content)) {
        writeln!(out, "{}  {}", bar, line)?;
    }

    Ok(())
}

pub fn add_note(
    notes: &mut NotesViewModel,
    title: &str,
    content: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let submission = Submission::new(title, content)?;
    let note = notes.submit(submission).context("Failed to save the new note")?;

    writeln!(
        out,
        "{}  {} {} {}",
        "┃".bright_magenta(),
        "Saved".bright_green(),
        note.title.bold(),
        format!("({})", note.id).dimmed()
    )?;
    Ok(())
}

/// Deletes the note named by exact id or exact title
///
/// Partial titles are refused, and so is a title shared by several notes.
pub fn delete_note(notes: &mut NotesViewModel, query: &str, out: &mut dyn Write) -> Result<()> {
    let bar = "┃".bright_magenta();
    let (id, title) = match notes.find_exact(query).as_slice() {
        [] => return not_found(notes, query, out),
        [note] => (note.id.clone(), note.title.clone()),
        candidates => {
            writeln!(
                out,
                "{}  {} notes are titled \"{}\"; delete one by ID:",
                bar,
                candidates.len(),
                query
            )?;
            for note in candidates {
                writeln!(
                    out,
                    "{}  {} {} {}",
                    bar,
                    note.id.yellow(),
                    note.title.bright_white(),
                    note.date.dimmed()
                )?;
            }
            return Ok(());
        }
    };

    notes
        .delete(&id)
        .with_context(|| format!("Failed to delete \"{title}\""))?;

    writeln!(out, "{}  {} {}", bar, "Deleted".bright_red(), title.bold())?;
    Ok(())
}

fn not_found(notes: &NotesViewModel, query: &str, out: &mut dyn Write) -> Result<()> {
    let bar = "┃".bright_magenta();
    writeln!(out, "{}  No note found with title or ID: {}", bar, query)?;
    if notes.notes().is_empty() {
        return Ok(());
    }

    writeln!(out, "{}  Available notes:", bar)?;
    writeln!(out, "{}", "─".repeat(60).bright_magenta())?;
    for (idx, note) in notes.notes().iter().enumerate().take(10) {
        writeln!(
            out,
            "{}  {}. {}",
            bar,
            (idx + 1).to_string().yellow(),
            note.title.bright_white()
        )?;
    }
    if notes.notes().len() > 10 {
        writeln!(out, "{}  ... and {} more", bar, notes.notes().len() - 10)?;
    }
    Ok(())
}

/// Terminal lines for a rendered note, blocks separated by a blank line
fn tree_lines(tree: &DisplayTree) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in tree.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        block_lines(block, "", &mut lines);
    }
    lines
}

fn block_lines(block: &Block, indent: &str, lines: &mut Vec<String>) {
    match block {
        Block::Heading { level, content } => {
            let text = inline_text(content);
            let styled = match level {
                1 => text.bright_magenta().bold().underline(),
                2 => text.bright_blue().bold(),
                _ => text.cyan().bold(),
            };
            lines.push(format!("{indent}{styled}"));
        }
        Block::Paragraph(content) => {
            for line in inline_text(content).split('\n') {
                lines.push(format!("{indent}{line}"));
            }
        }
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match start {
                    Some(n) => format!("{}. ", n + i as u64),
                    None => "• ".to_string(),
                };
                let nested = format!("{indent}{}", " ".repeat(marker.chars().count()));
                let first = lines.len();
                for block in item {
                    block_lines(block, &nested, lines);
                }
                match lines.get_mut(first) {
                    Some(line) => {
                        *line = format!("{indent}{}{}", marker.yellow(), &line[nested.len()..]);
                    }
                    None => lines.push(format!("{indent}{}", marker.yellow())),
                }
            }
        }
        Block::Quote(blocks) => {
            let mut inner = Vec::new();
            for block in blocks {
                block_lines(block, "", &mut inner);
            }
            for line in inner {
                lines.push(format!("{indent}{} {}", "│".bright_black(), line.italic()));
            }
        }
        Block::CodeBlock { language, code } => {
            if let Some(language) = language {
                lines.push(format!("{indent}{}", language.dimmed()));
            }
            for code_line in code.trim_end_matches('\n').lines() {
                lines.push(format!("{indent}  {}", code_line.yellow()));
            }
        }
        Block::Rule => lines.push(format!("{indent}{}", "─".repeat(40).bright_black())),
    }
}

fn inline_text(inlines: &[Inline]) -> String {
    inlines.iter().map(inline_piece).collect()
}

fn inline_piece(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Code(code) => code.yellow().to_string(),
        Inline::Emphasis(children) => inline_text(children).italic().to_string(),
        Inline::Strong(children) => inline_text(children).bold().to_string(),
        Inline::Strikethrough(children) => inline_text(children).strikethrough().to_string(),
        Inline::Link { url, content } => {
            let text = inline_text(content);
            if Inline::plain_text(content) == *url {
                text.bright_blue().underline().to_string()
            } else {
                format!("{} {}", text.bright_blue().underline(), format!("({url})").dimmed())
            }
        }
        Inline::Image { url, alt } => {
            let alt = Inline::plain_text(alt);
            let label = if alt.is_empty() { url.clone() } else { alt };
            format!("[image: {label}]").dimmed().to_string()
        }
        Inline::LineBreak => "\n".to_string(),
    }
}
