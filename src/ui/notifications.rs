//! Notification overlay listing alert history, newest first.

use std::time::SystemTime;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the notification list as a centered modal.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);

    let log = app.scheduler.notifications();
    let title = format!(" Notifications ({}) ", log.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    if log.is_empty() {
        let paragraph = Paragraph::new("No notifications")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, overlay);
        return;
    }

    let items: Vec<ListItem> = log
        .entries()
        .map(|entry| {
            let marker = if entry.read { " " } else { "●" };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} {} ", marker, entry.severity.symbol()),
                    app.theme.severity_style(entry.severity),
                ),
                Span::raw(entry.message.clone()),
                Span::styled(
                    format!("  {}", format_age(entry.timestamp)),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_notification));
    frame.render_stateful_widget(list, overlay, &mut state);
}

/// Rough age of an entry, e.g. "12s ago" or "3m ago".
fn format_age(timestamp: SystemTime) -> String {
    let secs = timestamp.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    if secs >= 3600 {
        format!("{}h ago", secs / 3600)
    } else if secs >= 60 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}s ago", secs)
    }
}
