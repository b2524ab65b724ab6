//! Application module
//!
//! Contains the event loop, key dispatch and the link to the background
//! install worker.
//!
//! # Module Structure
//! - `state` - Application state types (AppState, AppMode, ArchiveEntry)
//! - Main module - App struct and event loop

mod state;

pub use state::{AppMode, AppState, ArchiveEntry, InstallProgress};

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info, warn};

use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config_file::InstallerConfig;
use crate::error::Result;
use crate::input::{InputResult, PathField};
use crate::installer::{spawn_install, InstallEvent};
use crate::ui::UiRenderer;

/// Rows moved by PgUp/PgDn
const PAGE: isize = 10;

/// Main application struct
pub struct App {
    state: AppState,
    ui_renderer: UiRenderer,
    /// Keybinding context for key dispatch and navigation hints
    keybinding_context: KeybindingContext,
    /// Progress from the install worker, present while a batch runs
    install_rx: Option<Receiver<InstallEvent>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config_path: impl Into<PathBuf>, config: &InstallerConfig) -> Self {
        info!("Creating new App instance");
        let mut state = AppState::new(config_path, config);
        state.initialize();
        Self {
            state,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            install_rx: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_install_events();

            terminal.draw(|f| {
                self.ui_renderer
                    .render(f, &self.state, &self.keybinding_context)
            })?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    if key_event.kind == KeyEventKind::Press && self.handle_key_event(key_event) {
                        break;
                    }
                }
            }
        }

        info!("Leaving main application loop");
        Ok(())
    }

    /// Drain pending worker messages without blocking
    pub fn poll_install_events(&mut self) {
        let Some(rx) = self.install_rx.as_ref() else {
            return;
        };

        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if self.state.apply_event(event) {
                        self.install_rx = None;
                        return;
                    }
                }
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    warn!("Install worker disconnected before finishing");
                    self.state.install_aborted();
                    self.install_rx = None;
                    return;
                }
            }
        }
    }

    /// Handle keyboard input events; returns `true` when the app should exit
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        let mode = self.state.mode;

        // Text entry sees every key
        if mode == AppMode::EditPath {
            if let Some(dialog) = self.state.input.as_mut() {
                match dialog.handle_input(key_event) {
                    InputResult::Confirm(value) => self.state.close_path_editor(Some(value)),
                    InputResult::Cancel => self.state.close_path_editor(None),
                    InputResult::Continue => {}
                }
            } else {
                self.state.close_dialog();
            }
            return false;
        }

        let action =
            self.keybinding_context
                .action_for(&mode, key_event.code, key_event.modifiers);

        // Help overlay swallows everything except its own toggles
        if self.state.help_visible {
            if matches!(action, Some(KeyAction::Help))
                || key_event.code == crossterm::event::KeyCode::Esc
            {
                self.state.help_visible = false;
            }
            return false;
        }

        let Some(action) = action else {
            return false;
        };
        debug!("{:?} in {:?}", action, mode);
        self.dispatch(mode, action)
    }

    fn dispatch(&mut self, mode: AppMode, action: KeyAction) -> bool {
        let state = &mut self.state;
        match (mode, action) {
            (_, KeyAction::Help) => state.help_visible = true,
            (_, KeyAction::Quit) => return state.can_quit(),

            (AppMode::Browse, KeyAction::NavigateUp) => state.move_cursor(-1),
            (AppMode::Browse, KeyAction::NavigateDown) => state.move_cursor(1),
            (AppMode::Browse, KeyAction::Home) => state.cursor_home(),
            (AppMode::Browse, KeyAction::End) => state.cursor_end(),
            (AppMode::Browse, KeyAction::ToggleArchive) => state.toggle_current(),
            (AppMode::Browse, KeyAction::SelectAll) => state.select_all(),
            (AppMode::Browse, KeyAction::SelectNone) => state.select_none(),
            (AppMode::Browse, KeyAction::Refresh) => state.refresh_archives(),
            (AppMode::Browse, KeyAction::DetectVersion) => state.detect_version(),
            (AppMode::Browse, KeyAction::EditGamePath) => {
                state.open_path_editor(PathField::GamePath)
            }
            (AppMode::Browse, KeyAction::EditZipFolder) => {
                state.open_path_editor(PathField::ZipFolder)
            }
            (AppMode::Browse, KeyAction::Preview) => state.open_preview(),
            (AppMode::Browse | AppMode::Preview, KeyAction::Install) => state.request_install(),
            (AppMode::Browse | AppMode::Installing, KeyAction::ScrollUp) => state.scroll_log(PAGE),
            (AppMode::Browse | AppMode::Installing, KeyAction::ScrollDown) => {
                state.scroll_log(-PAGE)
            }

            (AppMode::Preview, KeyAction::ScrollUp) => state.scroll_preview(-1),
            (AppMode::Preview, KeyAction::ScrollDown) => state.scroll_preview(1),
            (AppMode::Preview, KeyAction::PageUp) => state.scroll_preview(-PAGE),
            (AppMode::Preview, KeyAction::PageDown) => state.scroll_preview(PAGE),
            (AppMode::Preview, KeyAction::Home) => state.preview_scroll = 0,
            (AppMode::Preview, KeyAction::End) => state.preview_end(),
            (AppMode::Preview | AppMode::Summary, KeyAction::Dismiss) => state.close_dialog(),

            (AppMode::ConfirmInstall, KeyAction::ToggleButton) => {
                state.confirm_install = !state.confirm_install
            }
            (AppMode::ConfirmInstall, KeyAction::Confirm) => {
                let install = state.confirm_install;
                self.start_install(install);
            }
            (AppMode::ConfirmInstall, KeyAction::Install) => self.start_install(true),
            (AppMode::ConfirmInstall, KeyAction::Cancel) => self.start_install(false),

            _ => {}
        }
        false
    }

    fn start_install(&mut self, install: bool) {
        if let Some((installer, archives)) = self.state.answer_confirm(install) {
            info!(
                "Starting installation of {} archive(s) for version {}",
                archives.len(),
                installer.version()
            );
            self.install_rx = Some(spawn_install(installer, archives));
        }
    }
}
