//! folio - a personal portfolio in the terminal
//!
//! Shows a profile page and a notes page where Markdown notes can be
//! written, read and deleted. The notes are kept in a small key-value store
//! on disk so they survive restarts. Any arguments switch to the
//! non-interactive CLI instead of the TUI.

use crate::app::App;
use crate::config::AppConfig;
use crate::markdown::MarkdownRenderer;
use crate::models::{FileKeyValueStore, MemoryKeyValueStore, NoteStore};
use crate::notes::NotesViewModel;
use anyhow::Context;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::error::Error;
use std::io::{self};
use std::time::Duration;
use tracing::{info, warn};

mod app;
mod cli;
mod config;
mod handlers;
mod logging;
mod markdown;
mod models;
mod notes;
mod ui;

/// Application entry point and initialization
fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;

    let config = AppConfig::load()?;
    let logging_problem = logging::init_logging(&config)
        .err()
        .map(|e| format!("Logging disabled: {e:#}"));
    info!(version = env!("CARGO_PKG_VERSION"), "starting folio");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        if let Some(problem) = &logging_problem {
            cli::print_warning(&mut io::stderr().lock(), problem)?;
        }

        // the CLI must not pretend to save into a throwaway store
        let store = open_file_store(&config)?;
        let mut notes = NotesViewModel::initialize(store, &config.display.date_format);
        cli::execute_cli(
            &args,
            &mut notes,
            &MarkdownRenderer,
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
        )?;
        return Ok(());
    }

    let (store, store_problem) = match open_file_store(&config) {
        Ok(store) => (store, None),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "falling back to an in-memory note store");
            let store = NoteStore::new(Box::new(MemoryKeyValueStore::new()), config.notes_key()?);
            (store, Some(format!("Notes will not be saved: {e:#}")))
        }
    };

    let notes = NotesViewModel::initialize(store, &config.display.date_format);
    let mut app = App::new(notes, Box::new(MarkdownRenderer), config.profile);
    if let Some(problem) = store_problem.or(logging_problem) {
        app.set_error_message(problem);
    }

    run_tui(&mut app)?;
    info!("folio closed");

    Ok(())
}

fn open_file_store(config: &AppConfig) -> anyhow::Result<NoteStore> {
    let key = config.notes_key()?;
    let dir = config.store_dir()?;
    let backend = FileKeyValueStore::new(&dir)
        .with_context(|| format!("Failed to open note store in {}", dir.display()))?;
    info!(root = %backend.root().display(), key = %key, "file note store opened");

    Ok(NoteStore::new(Box::new(backend), key))
}

/// Sets up the terminal, runs the event loop and restores the terminal
/// even when the loop fails
fn run_tui(app: &mut App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let mut should_quit = false;

    while !should_quit {
        terminal.draw(|frame| app.render(frame))?;
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                should_quit = handlers::keys::handle_key_events(key, app);
            }
        }
    }

    Ok(())
}
