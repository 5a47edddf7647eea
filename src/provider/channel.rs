//! Channel-based snapshot provider.
//!
//! Receives metric snapshots via a tokio watch channel. Useful when
//! snapshots are pushed from elsewhere (a remote agent, a test
//! harness) rather than measured locally.

use tokio::sync::watch;

use super::{MetricSnapshot, NetworkInterfaceInfo, ProviderError, SnapshotProvider};

/// A provider that receives snapshots pushed through a channel.
///
/// The producer sends complete [`MetricSnapshot`]s; network info is
/// answered from the most recently received snapshot.
///
/// # Example
///
/// ```
/// use sysdock::provider::ChannelProvider;
///
/// let (tx, provider) = ChannelProvider::create("agent://remote-host");
/// ```
#[derive(Debug)]
pub struct ChannelProvider {
    receiver: watch::Receiver<MetricSnapshot>,
    description: String,
    /// Track whether the initial value has been delivered yet.
    initial_returned: bool,
}

impl ChannelProvider {
    /// Create a provider from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<MetricSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for pushing snapshots to the dashboard.
    ///
    /// Returns (sender, provider).
    pub fn create(source_description: &str) -> (watch::Sender<MetricSnapshot>, Self) {
        let (tx, rx) = watch::channel(MetricSnapshot::default());
        let provider = Self::new(rx, source_description);
        (tx, provider)
    }
}

impl SnapshotProvider for ChannelProvider {
    fn fetch_snapshot(&mut self) -> Result<MetricSnapshot, ProviderError> {
        // Deliver the initial value on the first fetch.
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Ok(self.receiver.borrow_and_update().clone())
        } else {
            // No fresh value is a skipped tick, not fatal.
            Err(ProviderError::Unavailable("no new snapshot on channel".to_string()))
        }
    }

    fn fetch_network_info(&mut self) -> Result<Vec<NetworkInterfaceInfo>, ProviderError> {
        Ok(self.receiver.borrow().network.clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CpuMetrics;

    #[test]
    fn test_channel_provider_poll() {
        let (tx, mut provider) = ChannelProvider::create("test");

        // Initially returns the default (empty) snapshot.
        let snapshot = provider.fetch_snapshot();
        assert!(snapshot.is_ok());

        // No change, so the next fetch is a skipped tick.
        assert!(provider.fetch_snapshot().is_err());

        // Send a new snapshot.
        let new_snapshot = MetricSnapshot {
            cpu: CpuMetrics {
                usage_percent: 42.0,
                ..CpuMetrics::default()
            },
            ..MetricSnapshot::default()
        };
        tx.send(new_snapshot).unwrap();

        let snapshot = provider.fetch_snapshot().unwrap();
        assert_eq!(snapshot.cpu.usage_percent, 42.0);
    }

    #[test]
    fn test_channel_provider_network_info() {
        let (tx, mut provider) = ChannelProvider::create("test");

        let snapshot = MetricSnapshot {
            network: vec![NetworkInterfaceInfo {
                name: "eth0".to_string(),
                ..NetworkInterfaceInfo::default()
            }],
            ..MetricSnapshot::default()
        };
        tx.send(snapshot).unwrap();
        let _ = provider.fetch_snapshot();

        let interfaces = provider.fetch_network_info().unwrap();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "eth0");
    }
}
