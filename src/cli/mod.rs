//! CLI Module for folio
//!
//! Lets the notes be listed, read, written and removed straight from the
//! shell without launching the TUI.

pub mod commands;

use crate::markdown::NoteRenderer;
use crate::notes::NotesViewModel;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{Read, Write};

/// Executes CLI commands based on the provided arguments
///
/// `input` is only read by `add <TITLE> -`.
pub fn execute_cli(
    args: &[String],
    notes: &mut NotesViewModel,
    renderer: &dyn NoteRenderer,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(command) = args.first() else {
        return print_help(out);
    };

    match command.as_str() {
        "list" | "ls" => commands::list_notes(notes, renderer, out)?,
        "show" | "view" | "cat" => match args.get(1) {
            Some(query) => commands::show_note(notes, renderer, query, out)?,
            None => usage(out, "Missing note title or ID", "folio show <ID|TITLE>")?,
        },
        "add" | "new" => match (args.get(1), args.get(2)) {
            (Some(title), Some(content)) => {
                let content = if content == "-" {
                    let mut buffer = String::new();
                    input
                        .read_to_string(&mut buffer)
                        .context("Failed to read note content from stdin")?;
                    buffer
                } else {
                    content.clone()
                };
                commands::add_note(notes, title, &content, out)?;
            }
            _ => usage(
                out,
                "Missing note title or content",
                "folio add <TITLE> <CONTENT|->",
            )?,
        },
        "delete" | "rm" => match args.get(1) {
            Some(query) => commands::delete_note(notes, query, out)?,
            None => usage(out, "Missing note title or ID", "folio delete <ID|TITLE>")?,
        },
        "path" => writeln!(out, "{}", notes.store_location())?,
        "help" | "--help" | "-h" => print_help(out)?,
        _ => {
            writeln!(out, "{}  Unknown command: {}", "┃".bright_magenta(), command)?;
            print_help(out)?;
        }
    }

    Ok(())
}

/// Reports a startup problem that does not stop the command from running
pub fn print_warning(err: &mut dyn Write, problem: &str) -> Result<()> {
    writeln!(err, "{}  {} {}", "┃".bright_magenta(), "Warning:".bright_yellow(), problem)?;
    Ok(())
}

fn usage(out: &mut dyn Write, problem: &str, usage: &str) -> Result<()> {
    writeln!(out, "{}  Error: {}", "┃".bright_magenta(), problem)?;
    writeln!(out, "{}  Usage: {}", "┃".bright_magenta(), usage)?;
    Ok(())
}

/// Prints the help message with available commands
fn print_help(out: &mut dyn Write) -> Result<()> {
    let bar = "┃".bright_magenta();
    writeln!(out, "{}  {}", bar, "FOLIO - PORTFOLIO NOTES".bold())?;
    writeln!(out, "{}  {}", bar, "USAGE:".bright_yellow())?;
    writeln!(out, "{}  folio [COMMAND] [ARGS]", bar)?;
    writeln!(out, "{}  {}", bar, "COMMANDS:".bright_yellow())?;

    let commands = [
        ("list, ls", "List all notes, oldest first"),
        ("show <ID|TITLE>", "Display a note (partial titles work)"),
        ("add <TITLE> <CONTENT>", "Write a new note"),
        ("add <TITLE> -", "Write a new note, reading content from stdin"),
        ("delete, rm <ID|TITLE>", "Delete a note (exact title or ID only)"),
        ("path", "Print where the notes are stored"),
        ("help", "Display this help message"),
    ];
    for (command, description) in commands {
        writeln!(out, "{}  {:<27} {}", bar, command.bright_white(), description)?;
    }

    writeln!(out, "{}  {}", bar, "TIP:".bright_green())?;
    writeln!(
        out,
        "{}  Run with no arguments to launch the full TUI (Terminal User Interface) mode",
        bar
    )?;
    Ok(())
}
