//! Header and common widget rendering
//!
//! Title banner, the path/version panel, progress gauge, status line and
//! navigation bar.

use crate::app::{AppMode, AppState};
use crate::components::keybindings::KeybindingContext;
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Header renderer containing the title banner
pub struct HeaderRenderer {
    header_lines: Vec<Line<'static>>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    /// Create a new header renderer
    pub fn new() -> Self {
        Self {
            header_lines: Self::create_header(),
        }
    }

    /// Render the title banner
    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Paragraph::new(self.header_lines.clone()).alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn create_header() -> Vec<Line<'static>> {
        vec![Line::from(vec![
            Span::styled("World of Tanks", Styles::title()),
            Span::styled(" · ", Styles::text_muted()),
            Span::styled(
                "Mod Installer",
                Style::default()
                    .fg(Colors::SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  v{}", env!("CARGO_PKG_VERSION")),
                Styles::text_muted(),
            ),
        ])]
    }
}

fn field<'a>(label: &'a str, value: String, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), Styles::label()),
        Span::styled(value, value_style),
    ])
}

/// Render the game path, version and archive folder panel
pub fn render_info_panel(f: &mut Frame, state: &AppState, area: Rect) {
    let version_style = if state.version.is_some() {
        Styles::success().add_modifier(Modifier::BOLD)
    } else {
        Styles::error()
    };

    let mut lines = vec![
        field(
            "Game path:",
            state.game_path.display().to_string(),
            Styles::text(),
        ),
        field("Version:", state.version_label(), version_style),
        field(
            "Archive folder:",
            state.zip_folder.display().to_string(),
            Styles::text(),
        ),
    ];
    if let Some([mods, res_mods]) = state.target_folders() {
        lines.push(field(
            "Targets:",
            format!("{}  {}", mods.display(), res_mods.display()),
            Styles::text_secondary(),
        ));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_inactive())
            .title(" Settings (G: game path, Z: archive folder, D: detect) "),
    );
    f.render_widget(panel, area);
}

/// Render progress bar
pub fn render_progress_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let progress = &state.progress;
    let label = match (&progress.current, state.mode) {
        (Some(name), AppMode::Installing) => {
            format!("{}/{}  {}", progress.done, progress.total, name)
        }
        _ => format!("{}/{}", progress.done, progress.total),
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_inactive())
                .title(" Progress "),
        )
        .gauge_style(Styles::progress())
        .ratio(progress.ratio())
        .label(label);
    f.render_widget(gauge, area);
}

/// Render the one-line status message
pub fn render_status(f: &mut Frame, state: &AppState, area: Rect) {
    let style = if state.mode == AppMode::Installing {
        Styles::warning()
    } else {
        Styles::text_secondary()
    };
    f.render_widget(Paragraph::new(state.status_message.as_str()).style(style), area);
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext, area: Rect) {
    let mut spans = Vec::new();
    for (i, item) in keybinding_ctx.get_nav_items(&state.mode).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Styles::nav_hint()));
        }
        spans.push(Span::styled(
            item.key_display,
            Style::default()
                .fg(Colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(item.action_label, Styles::nav_hint()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
