//! Data processing for the telemetry engine.
//!
//! This module holds the stateful pieces between a raw
//! [`MetricSnapshot`](crate::provider::MetricSnapshot) and the UI:
//!
//! - [`history`]: fixed-window sample buffers for charting
//! - [`rates`]: per-second rates derived from cumulative counters
//! - [`alerts`]: threshold rules, the active alert, and the
//!   notification log
//!
//! ## Data flow
//!
//! ```text
//! MetricSnapshot (from provider)
//!        │
//!        ├──▶ RateCalculator (network counters → B/s)
//!        │
//!        ├──▶ HistoryStore (per-entity trailing-60 windows)
//!        │
//!        └──▶ AlertEngine ──▶ NotificationLog
//! ```

pub mod alerts;
pub mod history;
pub mod rates;

pub use alerts::{
    check_alerts, default_rules, ActiveAlert, AlertEngine, AlertMetric, AlertRule,
    AlertThresholds, NotificationEntry, NotificationLog, Severity,
};
pub use history::{HistoryBuffer, HistoryStore, HISTORY_CAPACITY};
pub use rates::{RateCalculator, RateSample};
