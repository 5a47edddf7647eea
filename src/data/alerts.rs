//! Threshold alerting and the notification log.
//!
//! Alert rules are static and evaluated in fixed priority order
//! against each new snapshot: CPU before memory before disks, first
//! match wins, at most one active alert. The notification log is a
//! separate, bounded store with its own lifecycle - an entry outlives
//! the condition that raised it until dismissed or cleared.

use std::collections::VecDeque;
use std::time::SystemTime;

use crate::provider::MetricSnapshot;

/// Maximum number of notification entries retained, newest first.
const MAX_NOTIFICATIONS: usize = 10;

/// Severity of an alert or notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Derive severity from alert message wording.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("critically") {
            Severity::Critical
        } else if lower.contains("high") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    /// Short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

/// Which snapshot field a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMetric {
    CpuUsage,
    MemoryUsage,
    /// Matches when any single disk exceeds the threshold.
    DiskUsage,
}

/// A static threshold rule. Rules are ordered by priority in the rule
/// list; the first satisfied rule produces the active alert.
#[derive(Debug, Clone)]
pub struct AlertRule {
    pub metric: AlertMetric,
    pub threshold: f64,
    pub message: &'static str,
}

impl AlertRule {
    fn is_satisfied(&self, snapshot: &MetricSnapshot) -> bool {
        match self.metric {
            AlertMetric::CpuUsage => f64::from(snapshot.cpu.usage_percent) > self.threshold,
            AlertMetric::MemoryUsage => snapshot.memory.percentage > self.threshold,
            AlertMetric::DiskUsage => {
                snapshot.disks.iter().any(|d| d.percentage > self.threshold)
            }
        }
    }
}

/// Threshold values for the standard rule set.
#[derive(Debug, Clone, Copy)]
pub struct AlertThresholds {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu: 90.0,
            memory: 90.0,
            disk: 95.0,
        }
    }
}

/// The standard rule set in priority order: CPU > memory > disk.
pub fn default_rules(thresholds: AlertThresholds) -> Vec<AlertRule> {
    vec![
        AlertRule {
            metric: AlertMetric::CpuUsage,
            threshold: thresholds.cpu,
            message: "High CPU usage!",
        },
        AlertRule {
            metric: AlertMetric::MemoryUsage,
            threshold: thresholds.memory,
            message: "Memory critically low!",
        },
        AlertRule {
            metric: AlertMetric::DiskUsage,
            threshold: thresholds.disk,
            message: "Disk space critically low!",
        },
    ]
}

/// One-shot evaluation returning every satisfied rule's message in
/// priority order. This is the delegated check path used by the
/// `--check` CLI mode; it shares the rule set with [`AlertEngine`] so
/// the two evaluation paths cannot disagree.
pub fn check_alerts(snapshot: &MetricSnapshot, thresholds: AlertThresholds) -> Vec<String> {
    default_rules(thresholds)
        .iter()
        .filter(|rule| rule.is_satisfied(snapshot))
        .map(|rule| rule.message.to_string())
        .collect()
}

/// The single alert currently in effect, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAlert {
    pub message: String,
    pub severity: Severity,
}

/// Evaluates the rule list against each snapshot and tracks the
/// active alert. Re-run on every snapshot, not debounced: clearing
/// the condition clears the alert on the next evaluation.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    rules: Vec<AlertRule>,
    active: Option<ActiveAlert>,
}

impl AlertEngine {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self {
            rules,
            active: None,
        }
    }

    /// Evaluate a snapshot. Returns the alert if this evaluation
    /// raised one that was not already active (by message equality) -
    /// the caller appends those to the notification log.
    pub fn observe(&mut self, snapshot: &MetricSnapshot) -> Option<ActiveAlert> {
        let hit = self.rules.iter().find(|rule| rule.is_satisfied(snapshot));

        match hit {
            Some(rule) => {
                let already_active =
                    self.active.as_ref().is_some_and(|a| a.message == rule.message);
                if already_active {
                    return None;
                }
                let alert = ActiveAlert {
                    message: rule.message.to_string(),
                    severity: Severity::from_message(rule.message),
                };
                self.active = Some(alert.clone());
                Some(alert)
            }
            None => {
                self.active = None;
                None
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveAlert> {
        self.active.as_ref()
    }
}

/// A single entry in the notification log.
#[derive(Debug, Clone)]
pub struct NotificationEntry {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub timestamp: SystemTime,
    pub read: bool,
}

/// Bounded, message-deduplicated notification history, newest first.
///
/// Independent of the active alert: dismissing an entry does not
/// suppress the underlying alert from re-firing later.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: VecDeque<NotificationEntry>,
    next_id: u64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification unless an entry with the same message is
    /// already present. Returns whether an entry was added.
    pub fn push(&mut self, message: &str, severity: Severity) -> bool {
        if self.entries.iter().any(|e| e.message == message) {
            return false;
        }

        self.next_id += 1;
        self.entries.push_front(NotificationEntry {
            id: self.next_id,
            message: message.to_string(),
            severity,
            timestamp: SystemTime::now(),
            read: false,
        });
        while self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.pop_back();
        }
        true
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &NotificationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    /// Mark every entry read (opening the list does this).
    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    /// Remove one entry by id. Returns whether it existed.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Empty the log.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
