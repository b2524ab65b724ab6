//! Archive selection list and the installation log

use crate::app::{AppMode, AppState};
use crate::theme::{LogLevel, Styles, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the checkbox list of archives
pub fn render_archive_list(f: &mut Frame, state: &AppState, area: Rect) {
    let selected = state.archives.iter().filter(|a| a.selected).count();
    let title = format!(" Archives ({selected}/{}) ", state.archives.len());
    let focused = state.mode == AppMode::Browse;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border_inactive()
        })
        .title(title);

    if state.archives.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled("No archives found.", Styles::warning())),
            Line::from(""),
            Line::from(Span::styled(
                "Put .zip mods into the archive folder and press R.",
                Styles::text_muted(),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .archives
        .iter()
        .map(|entry| {
            let (mark, style) = if entry.selected {
                ("[x] ", Styles::checked())
            } else {
                ("[ ] ", Styles::text_muted())
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(entry.name.clone(), Styles::text()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Styles::selected())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

/// Render the timestamped log, following the newest line unless scrolled.
pub fn render_log(f: &mut Frame, state: &AppState, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let end = state.log.len().saturating_sub(state.log_scroll);
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = state
        .log
        .range(start..end)
        .map(|line| {
            Line::from(Span::styled(
                line.as_str(),
                Theme::log_style(LogLevel::classify(line)),
            ))
        })
        .collect();

    let title = if state.log_scroll > 0 {
        format!(" Log (-{}) ", state.log_scroll)
    } else {
        " Log ".to_string()
    };
    let log = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_inactive())
            .title(title),
    );
    f.render_widget(log, area);
}
