//! Snapshot provider abstraction.
//!
//! This module provides a trait-based seam between the telemetry
//! engine and whatever actually measures the system - the real
//! sysinfo-backed provider, or a channel fed by something else
//! entirely (tests, a remote agent).

mod channel;
mod snapshot;
mod system;

pub use channel::ChannelProvider;
pub use snapshot::{
    CpuMetrics, DiskMetrics, GpuMetrics, MemoryMetrics, MetricSnapshot, NetworkInterfaceInfo,
};
pub use system::SystemProvider;

use std::fmt::Debug;

use thiserror::Error;

/// Errors a provider can surface.
///
/// None of these are fatal to the engine: the scheduler treats any
/// provider error as "skip this tick" and keeps the previous snapshot
/// and histories on display.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The underlying metrics source could not be reached or read.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The source returned data this engine could not interpret.
    #[error("malformed provider data: {0}")]
    Malformed(String),
}

/// Trait for fetching resource telemetry from some backend.
///
/// Network interfaces are fetched through a separate call because the
/// network view polls on its own, typically slower, cadence.
///
/// # Example
///
/// ```
/// use sysdock::provider::{ChannelProvider, SnapshotProvider};
///
/// let (_tx, mut provider) = ChannelProvider::create("test");
/// // First poll yields the channel's initial (default) snapshot.
/// assert!(provider.fetch_snapshot().is_ok());
/// ```
pub trait SnapshotProvider: Send + Debug {
    /// Fetch a full snapshot of cpu/memory/disk/gpu state.
    ///
    /// Must be idempotent and side-effect-free from the engine's
    /// perspective. Should not block longer than one measurement.
    fn fetch_snapshot(&mut self) -> Result<MetricSnapshot, ProviderError>;

    /// Fetch the current network interface readings.
    fn fetch_network_info(&mut self) -> Result<Vec<NetworkInterfaceInfo>, ProviderError>;

    /// Human-readable description of the source, for the status bar.
    fn description(&self) -> &str;
}
