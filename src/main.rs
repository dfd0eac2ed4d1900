//! svcpkg-manager binary entry point.
//!
//! Parses flags, loads settings, sets up file logging, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the terminal
//! state on exit.
//!
use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use svcpkg_manager::api::HttpServiceClient;
use svcpkg_manager::app::keymap::Keymap;
use svcpkg_manager::app::settings::{self, Settings};
use svcpkg_manager::app::worker::Worker;
use svcpkg_manager::app::{self, AppState, Theme};

#[derive(Parser, Debug)]
#[command(name = "svcpkg-manager", version, about = "Manage service packages over a REST API")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long, env = "SVCPKG_BASE_URL")]
    base_url: Option<String>,

    /// Collection path relative to the base URL
    #[arg(long)]
    collection_path: Option<String>,

    /// Directory holding settings.conf, theme.conf and keybinds.conf
    #[arg(long, env = "SVCPKG_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (defaults to svcpkg-manager.log in the config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Reject non-numeric price, duration and accuracy before submitting
    #[arg(long)]
    strict_numbers: bool,

    /// Refetch the list after a delete instead of removing the row locally
    #[arg(long)]
    refetch_after_delete: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(path) = &self.collection_path {
            settings.collection_path = path.clone();
        }
        settings.strict_numbers |= self.strict_numbers;
        settings.refetch_after_delete |= self.refetch_after_delete;
    }
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> anyhow::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("create terminal")?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir = settings::config_dir(cli.config_dir.as_deref());
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("svcpkg-manager.log"));
    init_logging(&log_path)?;

    let mut cfg = Settings::load_or_init(&config_dir.join(settings::SETTINGS_FILE));
    cli.apply(&mut cfg);
    tracing::info!(base_url = %cfg.base_url, path = %cfg.collection_path, "starting");

    let api = HttpServiceClient::new(
        &cfg.base_url,
        &cfg.collection_path,
        Duration::from_secs(cfg.request_timeout_secs),
    )
    .context("build HTTP client")?;
    let worker = Worker::spawn(Box::new(api)).context("spawn request worker")?;

    let theme = Theme::load_or_init(&config_dir.join(settings::THEME_FILE));
    let keymap = Keymap::load_or_init(&config_dir.join(settings::KEYBINDS_FILE));
    let state = AppState::new(cfg, theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, state, worker);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
