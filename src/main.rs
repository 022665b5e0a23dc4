// postdeck: browse, search, and edit posts from a DummyJSON-style API.
// Entry point: logging, config, session store, and terminal lifecycle.

mod api;
mod app;
mod cache;
mod config;
mod error;
mod event;
mod state;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, PostsApi};
use crate::app::App;
use crate::cache::{FileStore, MemoryStore, SessionStore, paths};
use crate::config::Config;
use crate::error::Result;

/// Send tracing output to the log file; the terminal belongs to the TUI.
#[allow(clippy::collapsible_if)]
fn init_logging() {
    let Some(path) = paths::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postdeck=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn open_store(config: &Config) -> Arc<dyn SessionStore> {
    let Some(path) = &config.session_file else {
        tracing::warn!("no cache directory, session will not persist");
        return Arc::new(MemoryStore::new());
    };
    match FileStore::open(path.clone()) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "using session file");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "session file unusable, keeping session in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load()?;
    let client = ApiClient::new(&config.base_url)?;
    tracing::info!(
        base_url = %client.base_url(),
        page_limit = config.page_limit,
        debounce_ms = config.debounce_ms,
        "starting postdeck"
    );

    let api: Arc<dyn PostsApi> = Arc::new(client);
    let store = open_store(&config);
    state::posts::discard_cached_page(store.as_ref());
    let mut app = App::new(api, store, &config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal error");
    }
    tracing::info!("exiting");
    result?;
    Ok(())
}
