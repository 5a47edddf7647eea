//! Terminal user interface built with ratatui.

pub mod common;
pub mod meters;
pub mod network;
pub mod notifications;
pub mod theme;

pub use theme::Theme;
