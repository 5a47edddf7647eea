//! Dashboard color palette.
//!
//! One `Theme` value flows to every render function. Alert severities
//! and usage bands get their styles through the two helper methods so
//! the meters, the header badge, and the notification overlay agree on
//! what "critical" looks like.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Palette for the dashboard widgets.
///
/// [`Theme::auto_detect()`] picks a variant from the terminal
/// background; [`Theme::dark()`]/[`Theme::light()`] force one.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for sparklines, the active selection, and info badges.
    pub highlight: Color,
    /// Warning-band readings and unread notification counts.
    pub warning: Color,
    /// Critical-band readings and the active alert badge.
    pub critical: Color,
    /// Nominal readings and the "no alerts" badge.
    pub healthy: Color,
    /// Panel borders and de-emphasized text.
    pub border: Color,
    /// Table header rows.
    pub header: Style,
    /// The selected row in the interface table or notification list.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Variant for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Variant for light terminal backgrounds: blue accents and a
    /// light selection background that stay readable on white.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Pick a variant from the terminal's background luminance.
    /// Detection failure (pipes, unsupported terminals) falls back to
    /// dark.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for an alert or notification of the given severity.
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::default().fg(self.highlight),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for a usage percentage with the standard bands: red over
    /// 90, yellow over 70, green otherwise.
    pub fn usage_style(&self, percentage: f64) -> Style {
        if percentage > 90.0 {
            Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
        } else if percentage > 70.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.healthy)
        }
    }
}
