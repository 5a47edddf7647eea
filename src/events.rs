use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Category};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Notification overlay has its own key set
    if app.show_notifications {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') => app.close_notifications(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('d') | KeyCode::Delete => app.dismiss_selected_notification(),
            KeyCode::Char('c') => app.clear_notifications(),
            _ => {}
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Category switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_category();
            } else {
                app.next_category();
            }
        }
        KeyCode::BackTab => app.prev_category(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_category(),
        KeyCode::Right | KeyCode::Char('l') => app.next_category(),

        // Direct category access
        KeyCode::Char('1') => app.set_category(Category::Cpu),
        KeyCode::Char('2') => app.set_category(Category::Memory),
        KeyCode::Char('3') => app.set_category(Category::Gpu),
        KeyCode::Char('4') => app.set_category(Category::Disks),
        KeyCode::Char('5') => app.set_category(Category::Network),

        // List navigation (network interface table)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Notifications
        KeyCode::Char('n') => app.toggle_notifications(),

        // Manual refresh
        KeyCode::Char('r') => {
            let now = std::time::Instant::now();
            app.poll_now(now);
        }

        // Sensitive fields (IP addresses etc.)
        KeyCode::Char('s') => app.toggle_reveal_sensitive(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel moves the focused selection
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click on the tab row (row 1, after the header) switches category
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row == 1 {
                if let Some(category) = tab_at_column(mouse.column) {
                    app.set_category(category);
                }
            }
        }

        _ => {}
    }
}

/// Map a column in the tab bar to the category rendered there.
///
/// Mirrors the Tabs widget layout: each title is ` N:Label ` with
/// one-space padding on both sides, separated by a one-character
/// divider. Columns on a divider or past the last tab map to nothing.
pub fn tab_at_column(column: u16) -> Option<Category> {
    let mut x: u16 = 0;
    for (i, category) in Category::ALL.iter().enumerate() {
        let title_len = format!(" {}:{} ", i + 1, category.label()).len() as u16;
        let width = title_len + 2;
        if column >= x && column < x + width {
            return Some(*category);
        }
        x += width + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_at_column_matches_rendered_widths() {
        // " 1:CPU " padded: columns 0..9.
        assert_eq!(tab_at_column(0), Some(Category::Cpu));
        assert_eq!(tab_at_column(8), Some(Category::Cpu));
        // " 2:Memory " starts after the divider at column 9.
        assert_eq!(tab_at_column(10), Some(Category::Memory));
        assert_eq!(tab_at_column(21), Some(Category::Memory));
        // Narrow GPU label sits between two wider neighbors.
        assert_eq!(tab_at_column(23), Some(Category::Gpu));
        assert_eq!(tab_at_column(31), Some(Category::Gpu));
        assert_eq!(tab_at_column(33), Some(Category::Disks));
        assert_eq!(tab_at_column(45), Some(Category::Network));
        assert_eq!(tab_at_column(57), Some(Category::Network));
    }

    #[test]
    fn test_tab_at_column_dividers_and_overflow_select_nothing() {
        assert_eq!(tab_at_column(9), None);
        assert_eq!(tab_at_column(22), None);
        assert_eq!(tab_at_column(44), None);
        assert_eq!(tab_at_column(58), None);
        assert_eq!(tab_at_column(200), None);
    }
}
