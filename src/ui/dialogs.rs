//! Dialog rendering
//!
//! Path input, preview window, install confirmation and the result popup.
//! Every dialog clears its area first so the main screen stays visible
//! around it.

use crate::app::AppState;
use crate::input::InputDialog;
use crate::theme::{centered_rect, centered_rect_pct, LogLevel, Styles, Theme, UiConstants};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn dialog_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::panel_bg())
}

/// Render the path input dialog with a visible cursor
pub fn render_input_dialog(f: &mut Frame, dialog: &InputDialog) {
    let area = centered_rect(
        UiConstants::DIALOG_WIDTH_PCT,
        UiConstants::DIALOG_HEIGHT,
        f.area(),
    );
    f.render_widget(Clear, area);
    let block = dialog_block(dialog.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Keep the cursor in view for long paths
    let width = rows[1].width.max(1) as usize;
    let skip = dialog.cursor.saturating_sub(width.saturating_sub(1));
    let shown: String = dialog.value.chars().skip(skip).take(width).collect();

    f.render_widget(
        Paragraph::new(Span::styled(shown, Styles::text())),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter: apply   Esc: cancel   Ctrl+U: clear",
            Styles::text_muted(),
        )),
        rows[2],
    );

    let cursor_x = rows[1].x + (dialog.cursor - skip) as u16;
    f.set_cursor_position(Position::new(cursor_x, rows[1].y));
}

/// Render the scrollable preview of the selected archives
pub fn render_preview(f: &mut Frame, state: &AppState) {
    let area = centered_rect_pct(
        UiConstants::PREVIEW_WIDTH_PCT,
        UiConstants::PREVIEW_HEIGHT_PCT,
        f.area(),
    );
    f.render_widget(Clear, area);

    let lines: Vec<Line> = state
        .preview
        .iter()
        .map(|line| {
            let style = if line.starts_with("ERROR:") {
                Styles::error()
            } else if line.starts_with("Archive:") {
                Styles::title()
            } else if line.contains('→') {
                Styles::warning()
            } else {
                Styles::text()
            };
            Line::from(Span::styled(line.as_str(), style))
        })
        .collect();

    let title = format!(
        " Preview ({}/{}) - nothing is installed ",
        (state.preview_scroll + 1).min(state.preview.len()),
        state.preview.len()
    );
    let paragraph = Paragraph::new(lines)
        .block(dialog_block(title))
        .scroll((state.preview_scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn buttons(install_focused: bool) -> Line<'static> {
    let (install, cancel) = if install_focused {
        (Styles::button_active(), Styles::button_inactive())
    } else {
        (Styles::button_inactive(), Styles::button_active())
    };
    Line::from(vec![
        Span::styled("  Install  ", install),
        Span::raw("   "),
        Span::styled("  Cancel  ", cancel),
    ])
}

/// Render the yes/no dialog shown before installing
pub fn render_confirm_dialog(f: &mut Frame, state: &AppState) {
    let message = state.confirm_message();
    let area = centered_rect(
        UiConstants::DIALOG_WIDTH_PCT,
        message.len() as u16 + 5,
        f.area(),
    );
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = message
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Styles::text())))
        .collect();
    lines.push(Line::from(""));
    lines.push(buttons(state.confirm_install));

    let paragraph = Paragraph::new(lines)
        .block(dialog_block(" Confirm installation ".to_string()).style(Styles::panel_bg_danger()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render the popup shown when a batch has finished
pub fn render_summary(f: &mut Frame, state: &AppState) {
    let Some(summary) = state.summary.as_ref() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Installation completed!",
            Theme::log_style(LogLevel::Phase),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Successful: {}", summary.succeeded),
            Styles::success(),
        )),
        Line::from(Span::styled(
            format!("Failed: {}", summary.failed),
            if summary.is_success() {
                Styles::text_muted()
            } else {
                Styles::error()
            },
        )),
    ];
    let written: usize = summary.reports.iter().map(|r| r.files_written).sum();
    let skipped: usize = summary.reports.iter().map(|r| r.files_skipped).sum();
    lines.push(Line::from(Span::styled(
        format!("Files written: {written}, skipped: {skipped}"),
        Styles::text_secondary(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: close   Q: quit",
        Styles::text_muted(),
    )));

    let area = centered_rect(
        UiConstants::DIALOG_WIDTH_PCT,
        lines.len() as u16 + 2,
        f.area(),
    );
    f.render_widget(Clear, area);
    let title = if summary.is_success() {
        " Done "
    } else {
        " Done with errors "
    };
    let paragraph = Paragraph::new(lines)
        .block(dialog_block(title.to_string()))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
