//! Application state and navigation logic.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::poll::PollingScheduler;
use crate::provider::SnapshotProvider;
use crate::state::ViewStateStore;
use crate::ui::Theme;

/// The metric family currently rendered, and therefore the only one
/// actively polled at full detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Memory,
    Gpu,
    Disks,
    Network,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 5] = [
        Category::Cpu,
        Category::Memory,
        Category::Gpu,
        Category::Disks,
        Category::Network,
    ];

    /// Cycle to the next category.
    pub fn next(self) -> Self {
        match self {
            Category::Cpu => Category::Memory,
            Category::Memory => Category::Gpu,
            Category::Gpu => Category::Disks,
            Category::Disks => Category::Network,
            Category::Network => Category::Cpu,
        }
    }

    /// Cycle to the previous category.
    pub fn prev(self) -> Self {
        match self {
            Category::Cpu => Category::Network,
            Category::Memory => Category::Cpu,
            Category::Gpu => Category::Memory,
            Category::Disks => Category::Gpu,
            Category::Network => Category::Disks,
        }
    }

    /// Display label for the tab bar.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Memory => "Memory",
            Category::Gpu => "GPU",
            Category::Disks => "Disks",
            Category::Network => "Network",
        }
    }

    /// Index into [`Category::ALL`].
    pub fn index(&self) -> usize {
        Category::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Category::Cpu),
            "memory" | "mem" => Ok(Category::Memory),
            "gpu" => Ok(Category::Gpu),
            "disks" | "disk" => Ok(Category::Disks),
            "network" | "net" => Ok(Category::Network),
            other => Err(format!(
                "unknown category '{}' (expected cpu, memory, gpu, disks, or network)",
                other
            )),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_notifications: bool,

    /// Selected row in the notification overlay.
    pub selected_notification: usize,
    /// Selected row in the network interface table.
    pub selected_interface: usize,

    provider: Box<dyn SnapshotProvider>,
    pub scheduler: PollingScheduler,
    pub view_state: ViewStateStore,

    pub theme: Theme,

    /// Temporary feedback shown in the status bar.
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app and start polling `initial` immediately.
    pub fn new(
        provider: Box<dyn SnapshotProvider>,
        mut scheduler: PollingScheduler,
        view_state: ViewStateStore,
        initial: Category,
    ) -> Self {
        scheduler.start(initial);
        Self {
            running: true,
            show_help: false,
            show_notifications: false,
            selected_notification: 0,
            selected_interface: 0,
            provider,
            scheduler,
            view_state,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the snapshot provider.
    pub fn provider_description(&self) -> &str {
        self.provider.description()
    }

    /// The currently active category.
    pub fn category(&self) -> Category {
        self.scheduler.category().unwrap_or(Category::Cpu)
    }

    /// Drive the scheduler; called from the main loop.
    pub fn tick(&mut self, now: Instant) {
        self.scheduler.tick(self.provider.as_mut(), now);
    }

    /// Force an immediate poll (startup, manual refresh).
    pub fn poll_now(&mut self, now: Instant) {
        self.scheduler.poll_now(self.provider.as_mut(), now);
    }

    /// Switch tabs manually. Persists the new category as the stored
    /// default, unlike the startup `--category` override.
    pub fn set_category(&mut self, category: Category) {
        self.scheduler.set_category(category);
        self.selected_interface = 0;
        if let Err(e) = self.view_state.set_category(category) {
            self.set_status_message(format!("Could not save view state: {}", e));
        }
    }

    pub fn next_category(&mut self) {
        self.set_category(self.category().next());
    }

    pub fn prev_category(&mut self) {
        self.set_category(self.category().prev());
    }

    /// Open the notification overlay; opening marks all entries read.
    pub fn open_notifications(&mut self) {
        self.show_notifications = true;
        self.selected_notification = 0;
        self.scheduler.notifications_mut().mark_all_read();
    }

    pub fn close_notifications(&mut self) {
        self.show_notifications = false;
    }

    pub fn toggle_notifications(&mut self) {
        if self.show_notifications {
            self.close_notifications();
        } else {
            self.open_notifications();
        }
    }

    /// Dismiss the currently selected notification entry.
    pub fn dismiss_selected_notification(&mut self) {
        let id = self
            .scheduler
            .notifications()
            .entries()
            .nth(self.selected_notification)
            .map(|e| e.id);
        if let Some(id) = id {
            self.scheduler.notifications_mut().dismiss(id);
            let remaining = self.scheduler.notifications().len();
            if self.selected_notification >= remaining {
                self.selected_notification = remaining.saturating_sub(1);
            }
        }
    }

    pub fn clear_notifications(&mut self) {
        self.scheduler.notifications_mut().clear();
        self.selected_notification = 0;
    }

    /// Flip the persisted "reveal sensitive fields" preference.
    pub fn toggle_reveal_sensitive(&mut self) {
        match self.view_state.toggle_reveal_sensitive() {
            Ok(revealed) => {
                let state = if revealed { "shown" } else { "hidden" };
                self.set_status_message(format!("Sensitive fields {}", state));
            }
            Err(e) => self.set_status_message(format!("Could not save view state: {}", e)),
        }
    }

    /// Move selection down by one in whichever list is focused.
    pub fn select_next(&mut self) {
        if self.show_notifications {
            let max = self.scheduler.notifications().len().saturating_sub(1);
            self.selected_notification = (self.selected_notification + 1).min(max);
        } else if self.category() == Category::Network {
            let max = self.scheduler.interfaces().len().saturating_sub(1);
            self.selected_interface = (self.selected_interface + 1).min(max);
        }
    }

    /// Move selection up by one.
    pub fn select_prev(&mut self) {
        if self.show_notifications {
            self.selected_notification = self.selected_notification.saturating_sub(1);
        } else if self.category() == Category::Network {
            self.selected_interface = self.selected_interface.saturating_sub(1);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Current status message, if it has not expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Signal the application to quit. The polling session stops and
    /// view state is flushed; a fetch resolving later is discarded by
    /// the token guard.
    pub fn quit(&mut self) {
        self.scheduler.stop();
        if let Err(e) = self.view_state.save() {
            log::warn!("could not save view state on exit: {}", e);
        }
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_cycle_is_closed() {
        let mut c = Category::Cpu;
        for _ in 0..Category::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Category::Cpu);

        let mut c = Category::Network;
        for _ in 0..Category::ALL.len() {
            c = c.prev();
        }
        assert_eq!(c, Category::Network);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("cpu".parse::<Category>().unwrap(), Category::Cpu);
        assert_eq!("NET".parse::<Category>().unwrap(), Category::Network);
        assert_eq!("mem".parse::<Category>().unwrap(), Category::Memory);
        assert!("bogus".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_index_matches_all_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
