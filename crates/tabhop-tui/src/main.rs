mod input;
mod render;
mod runtime;
mod tracing_setup;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tabhop_core::browser::SnapshotBrowser;
use tabhop_core::config::CoreConfig;
use tabhop_core::data_source;
use tabhop_core::models::{KeyboardMode, PreferencesStorage};

use crate::runtime::run_app;
use crate::ui::App;

#[derive(Parser, Debug)]
#[command(name = "tabhop")]
#[command(about = "Search open tabs and bookmarks, then jump to one")]
struct Cli {
    /// Directory holding preferences and the session snapshot
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Session snapshot file (defaults to <data-dir>/session.json)
    #[arg(long)]
    session: Option<PathBuf>,

    /// Chromium Bookmarks file
    #[arg(long)]
    bookmarks: Option<PathBuf>,

    /// Keyboard mode for this run only; the saved preference is untouched
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Standard,
    Vi,
}

impl From<ModeArg> for KeyboardMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => KeyboardMode::Standard,
            ModeArg::Vi => KeyboardMode::Vi,
        }
    }
}

impl Cli {
    fn core_config(&self) -> CoreConfig {
        let mut config = match &self.data_dir {
            Some(dir) => CoreConfig::new(dir),
            None => CoreConfig::default(),
        };
        if let Some(session) = &self.session {
            config = config.with_session_path(session);
        }
        if let Some(bookmarks) = &self.bookmarks {
            config = config.with_bookmarks_path(bookmarks);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing();

    let config = cli.core_config();
    tracing::info!("Using data directory {}", config.data_dir.display());

    let prefs = PreferencesStorage::open(config.preferences_path());
    let browser = Arc::new(
        SnapshotBrowser::open(&config).context("Failed to open browser session")?,
    );
    // Nothing to show without the initial load, so failing here is fatal
    let items = data_source::load(browser.as_ref())
        .await
        .context("Failed to load tabs and bookmarks")?;

    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ui::restore_terminal();
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let mut app = App::new(browser, items, prefs, cli.mode.map(KeyboardMode::from));
    let mut terminal = ui::init_terminal()?;

    let result = run_app(&mut terminal, &mut app).await;

    ui::restore_terminal()?;

    if let Some(report) = &app.last_commit {
        tracing::info!(
            "Closed {} tab(s), {} close(s) failed",
            report.closed.len(),
            report.failed_closes.len()
        );
    }

    result
}
