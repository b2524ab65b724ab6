//! wotmods - Main entry point
//!
//! Headless subcommands print to stdout; without a subcommand the
//! interactive installer takes over the terminal.

use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use wotmods::app::App;
use wotmods::cli::{Cli, Commands};
use wotmods::commands;
use wotmods::config_file::InstallerConfig;

/// Log file used while the interactive form owns the terminal
const TUI_LOG_FILE: &str = "wot-mod-installer.log";

/// Initialize the logger with appropriate settings
///
/// `RUST_LOG` overrides the default level. In interactive mode output goes
/// to [`TUI_LOG_FILE`] so it cannot corrupt the screen.
fn init_logger(verbose: bool, interactive: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if interactive {
        match File::create(TUI_LOG_FILE) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            // No writable log file; stay silent rather than draw over the UI
            Err(_) => {
                tracing_subscriber::fmt()
                    .with_env_filter(EnvFilter::new("off"))
                    .init();
            }
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose, cli.is_interactive());
    info!("wotmods {} starting up", env!("CARGO_PKG_VERSION"));
    debug!("CLI arguments parsed: {:?}", cli);

    match cli.command.clone() {
        Some(Commands::Tui) | None => {
            info!("Launching interactive installer");
            run_tui_installer(&cli)
        }
        Some(command) => {
            let code = commands::run_from_cli(&cli, &command)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}

/// Run the interactive installer
fn run_tui_installer(cli: &Cli) -> Result<()> {
    let mut config = InstallerConfig::load_or_default(&cli.config);
    if let Some(ref game_path) = cli.game_path {
        config.game_path = game_path.clone();
    }
    if let Some(ref zip_folder) = cli.zip_folder {
        config.zip_folder = Some(zip_folder.clone());
    }

    // Build the state before the terminal switches, so a panic here is readable
    let mut app = App::new(&cli.config, &config);

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    if let Err(e) = crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let result = app.run(&mut terminal).map_err(anyhow::Error::from);
            let _ = terminal.show_cursor();
            result
        });

    // Cleanup terminal (always attempt cleanup, even if app failed)
    if let Err(e) = disable_raw_mode() {
        warn!("Failed to disable raw mode: {}", e);
    }
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    let state = app.state();
    if let Some(summary) = state.summary.as_ref() {
        println!(
            "Last installation: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
    }
    result
}
