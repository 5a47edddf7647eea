//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Category};

/// Render the header bar with the active alert and notification badge.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " SYSDOCK ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.scheduler.latest() {
        Some(snapshot) => {
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("CPU {:>4.1}%", snapshot.cpu.usage_percent),
                app.theme.usage_style(f64::from(snapshot.cpu.usage_percent)),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("MEM {:>4.1}%", snapshot.memory.percentage),
                app.theme.usage_style(snapshot.memory.percentage),
            ));
            spans.push(Span::raw(" │ "));
        }
        None => {
            spans.push(Span::raw("│ Loading... │ "));
        }
    }

    match app.scheduler.active_alert() {
        Some(alert) => {
            spans.push(Span::styled(
                format!("⚠ {} ", alert.message),
                app.theme.severity_style(alert.severity),
            ));
        }
        None => {
            spans.push(Span::styled(
                "no alerts ",
                Style::default().fg(app.theme.healthy),
            ));
        }
    }

    let unread = app.scheduler.notifications().unread_count();
    if unread > 0 {
        spans.push(Span::styled(
            format!("({} new) ", unread),
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing the metric categories.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!(" {}:{} ", i + 1, c.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.category().index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows data age, the provider description, and key hints. Temporary
/// status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let age = match app.scheduler.last_updated() {
        Some(at) => format!("Updated {:.1}s ago", at.elapsed().as_secs_f64()),
        None => "Waiting for first snapshot".to_string(),
    };

    let controls = if app.show_notifications {
        "↑↓:select d:dismiss c:clear all Esc:close"
    } else {
        "1-5/Tab:category n:notifications r:refresh s:sensitive ?:help q:quit"
    };

    let status = format!(" {} | {} | {}", age, app.provider_description(), controls);
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Format a byte count for display (e.g., 1234 -> "1.2 KB").
pub fn format_bytes(n: u64) -> String {
    const GB: f64 = 1_073_741_824.0;
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1024.0;
    let n = n as f64;
    if n >= GB {
        format!("{:.1} GB", n / GB)
    } else if n >= MB {
        format!("{:.1} MB", n / MB)
    } else if n >= KB {
        format!("{:.1} KB", n / KB)
    } else {
        format!("{:.0} B", n)
    }
}

/// Format a bytes-per-second rate for display.
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0).round() as u64))
}

/// Format an uptime in seconds as "Xd Xh Xm".
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1-5         Jump to category"),
        Line::from("  ←/→ h/l     Switch category"),
        Line::from("  Tab/S-Tab   Cycle categories"),
        Line::from("  ↑/↓ j/k     Navigate lists"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Notifications",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  n         Open/close list (opening marks read)"),
        Line::from("  d         Dismiss selected entry"),
        Line::from("  c         Clear all entries"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  s         Show/hide sensitive fields"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 48u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1_048_576), "5.0 MB");
        assert_eq!(format_bytes(3 * 1_073_741_824), "3.0 GB");
    }

    #[test]
    fn test_format_rate_clamps_negative() {
        assert_eq!(format_rate(-5.0), "0 B/s");
        assert_eq!(format_rate(2048.0), "2.0 KB/s");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(90), "1m");
        assert_eq!(format_uptime(3_700), "1h 1m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}
