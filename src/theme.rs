//! Centralized theme and styling for the TUI
//!
//! Single source of truth for colors, styles and layout constants, so the
//! widgets in `ui` never hardcode a color.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    /// Primary dark background - used for dialogs
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Warning/danger dialog background
    pub const BG_DANGER: Color = Color::Rgb(30, 20, 20);

    /// Gauge/progress bar background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    pub const FG_PRIMARY: Color = Color::White;
    pub const FG_SECONDARY: Color = Color::Gray;
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Primary accent color - used for borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color - used for selected items, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    pub const BORDER_ACTIVE: Color = Color::Cyan;
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Cursor row highlight
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Cursor row text (for contrast on yellow bg)
    pub const SELECTED_FG: Color = Color::Black;

    /// Checked archive marker
    pub const CHECKED: Color = Color::LightGreen;

    pub const PROGRESS: Color = Color::Green;
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// STYLE PRESETS
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Muted/secondary text
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Secondary text (gray)
    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style (cyan, bold)
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Field label in the header panel
    pub fn label() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    /// Dialog background
    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn panel_bg_danger() -> Style {
        Style::default().bg(Colors::BG_DANGER)
    }

    /// Cursor row in lists
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn checked() -> Style {
        Style::default()
            .fg(Colors::CHECKED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    /// Focused dialog button
    pub fn button_active() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_inactive() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Log level for styling log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
    Phase,
}

impl LogLevel {
    /// Classify an installation log line by its leading marker.
    ///
    /// A `[HH:MM:SS]` stamp and indentation are skipped first; markers
    /// later in the line (file names, error text) do not count.
    pub fn classify(line: &str) -> Self {
        let message = match line.strip_prefix('[').and_then(|rest| rest.split_once("] ")) {
            Some((_, message)) => message,
            None => line,
        }
        .trim_start();

        if message.starts_with('✗') || message.starts_with("Error:") {
            Self::Error
        } else if message.starts_with('⚠') {
            Self::Warning
        } else if message.starts_with('✓') {
            Self::Success
        } else if message.starts_with("===") {
            Self::Phase
        } else {
            Self::Info
        }
    }
}

/// Theme context providing semantic style lookups
pub struct Theme;

impl Theme {
    /// Get style for a log level
    pub fn log_style(level: LogLevel) -> Style {
        match level {
            LogLevel::Info => Style::default().fg(Colors::FG_PRIMARY),
            LogLevel::Warning => Style::default().fg(Colors::WARNING),
            LogLevel::Error => Style::default().fg(Colors::ERROR),
            LogLevel::Success => Style::default().fg(Colors::SUCCESS),
            LogLevel::Phase => Style::default()
                .fg(Colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

pub struct UiConstants;

impl UiConstants {
    pub const DIALOG_WIDTH_PCT: u16 = 60;
    pub const DIALOG_HEIGHT: u16 = 7;
    pub const PREVIEW_WIDTH_PCT: u16 = 85;
    pub const PREVIEW_HEIGHT_PCT: u16 = 80;
    /// Log lines kept in memory
    pub const LOG_CAPACITY: usize = 1000;
}

/// Rectangle of `percent_x` width and `height` rows centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Rectangle of the given percentages centered in `area`.
pub fn centered_rect_pct(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let height = area.height.saturating_mul(percent_y) / 100;
    centered_rect(percent_x, height, area)
}
