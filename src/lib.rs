// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # sysdock
//!
//! A system-resource dashboard and telemetry library for the terminal.
//!
//! This crate polls local hardware metrics (CPU, memory, GPU, disks,
//! network interfaces), maintains bounded per-metric history, derives
//! network throughput rates from cumulative counters, and evaluates
//! threshold alerts into a bounded notification log. The interactive
//! TUI renders one metric category at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   poll   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(scheduler)    │(rendering)   │         │  │
//! │  └────┬────┘    └────┬─────┘    └─────────┘    └─────────┘  │
//! │       │              ▼                                       │
//! │       │         ┌──────────┐                                 │
//! │       │         │   data   │ history / rates / alerts        │
//! │       │         └──────────┘                                 │
//! │       ▼                                                      │
//! │  ┌──────────┐                                                │
//! │  │ provider │◀── SystemProvider | ChannelProvider            │
//! │  │ (input)  │                                                │
//! │  └──────────┘                                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, category navigation, and user
//!   interaction logic
//! - **[`provider`]**: Snapshot source abstraction ([`SnapshotProvider`]
//!   trait) with a sysinfo-backed implementation and a channel-based one
//!   for external feeds
//! - **[`poll`]**: The polling scheduler - session lifecycle, cadence,
//!   category narrowing, and stale-result discard
//! - **[`data`]**: Bounded history buffers, counter-to-rate derivation,
//!   threshold alerting, and the notification log
//! - **[`state`]**: Persisted view state (last category, GPU sim phase,
//!   sensitive-field preference)
//! - **[`ui`]**: Terminal rendering using ratatui - gauges, sparklines,
//!   interface tables, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive dashboard
//! sysdock
//!
//! # Start on the network tab without changing the stored default
//! sysdock --category network
//!
//! # One-shot alert check (prints firing alerts, exits nonzero if any)
//! sysdock --check
//! ```
//!
//! ### As a library with the scheduler
//!
//! ```
//! use std::time::Instant;
//! use sysdock::data::{default_rules, AlertThresholds};
//! use sysdock::poll::{PollingIntervals, PollingScheduler};
//! use sysdock::provider::SystemProvider;
//! use sysdock::Category;
//!
//! let mut scheduler = PollingScheduler::new(
//!     PollingIntervals::default(),
//!     default_rules(AlertThresholds::default()),
//! );
//! let mut provider = SystemProvider::new(Default::default());
//!
//! scheduler.start(Category::Cpu);
//! scheduler.tick(&mut provider, Instant::now());
//! assert!(scheduler.latest().is_some());
//! ```
//!
//! ### As a library with a channel provider (for external feeds)
//!
//! ```
//! use sysdock::provider::{ChannelProvider, MetricSnapshot, SnapshotProvider};
//!
//! let (tx, mut provider) = ChannelProvider::create("remote agent");
//! tx.send(MetricSnapshot::default()).unwrap();
//! assert!(provider.fetch_snapshot().is_ok());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod poll;
pub mod provider;
pub mod state;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Category};
pub use config::Settings;
pub use data::{
    check_alerts, default_rules, ActiveAlert, AlertEngine, AlertRule, AlertThresholds,
    HistoryBuffer, HistoryStore, NotificationLog, RateCalculator, RateSample, Severity,
};
pub use poll::{PollingIntervals, PollingScheduler, SessionToken};
pub use provider::{
    ChannelProvider, CpuMetrics, DiskMetrics, GpuMetrics, MemoryMetrics, MetricSnapshot,
    NetworkInterfaceInfo, ProviderError, SnapshotProvider, SystemProvider,
};
pub use state::{ViewState, ViewStateStore};
