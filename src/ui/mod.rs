//! User interface rendering module
//!
//! This module is organized into submodules:
//! - `header` - Title, settings panel, progress gauge, status and nav bar
//! - `archives` - Archive checklist and the log pane
//! - `dialogs` - Input, preview, confirmation and summary dialogs

mod archives;
mod dialogs;
mod header;

use crate::app::{AppMode, AppState};
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use header::HeaderRenderer;

/// Main UI renderer
pub struct UiRenderer {
    /// Header renderer instance
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    /// Create a new UI renderer
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI based on application state
    pub fn render(&self, f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
        let info_height = if state.version.is_some() { 6 } else { 5 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // Title
                Constraint::Length(info_height), // Settings panel
                Constraint::Min(6),              // Archives and log
                Constraint::Length(3),           // Progress
                Constraint::Length(1),           // Status
                Constraint::Length(1),           // Navigation bar
            ])
            .split(f.area());

        self.header.render_header(f, chunks[0]);
        header::render_info_panel(f, state, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);
        archives::render_archive_list(f, state, body[0]);
        archives::render_log(f, state, body[1]);

        header::render_progress_bar(f, state, chunks[3]);
        header::render_status(f, state, chunks[4]);
        header::render_nav_bar(f, state, keybinding_ctx, chunks[5]);

        match state.mode {
            AppMode::Browse | AppMode::Installing => {}
            AppMode::EditPath => {
                if let Some(dialog) = state.input.as_ref() {
                    dialogs::render_input_dialog(f, dialog);
                }
            }
            AppMode::Preview => dialogs::render_preview(f, state),
            AppMode::ConfirmInstall => dialogs::render_confirm_dialog(f, state),
            AppMode::Summary => dialogs::render_summary(f, state),
        }

        if state.help_visible {
            HelpOverlay::new(&state.mode, keybinding_ctx).render(f, f.area());
        }
    }
}
