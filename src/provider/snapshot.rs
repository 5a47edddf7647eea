//! Shared types for metric snapshots.
//!
//! A [`MetricSnapshot`] is one immutable point-in-time reading of all
//! monitored resources. Snapshots are produced by a provider and
//! superseded wholesale by the next poll; nothing mutates one after
//! the fact.

use serde::{Deserialize, Serialize};

/// A complete point-in-time reading of all monitored resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disks: Vec<DiskMetrics>,
    pub gpu: GpuMetrics,
    /// Interface readings bundled with the snapshot. The network view
    /// polls interfaces separately on its own cadence; this copy is
    /// whatever the provider had on hand at snapshot time.
    #[serde(default)]
    pub network: Vec<NetworkInterfaceInfo>,
}

/// Processor usage and identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Mean usage across all cores, 0-100.
    pub usage_percent: f32,
    /// Current frequency in MHz.
    pub frequency_mhz: u64,
    pub cores: usize,
    pub brand: String,
    /// Package temperature in Celsius, when a sensor is exposed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub uptime_secs: u64,
}

/// Memory occupancy in bytes plus a derived percentage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub percentage: f64,
}

/// One mounted disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskMetrics {
    pub name: String,
    pub mount_point: String,
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub percentage: f64,
}

impl DiskMetrics {
    /// Stable identity for history keying; disk names alone collide
    /// across mount points on some platforms.
    pub fn entity_key(&self) -> String {
        format!("disk:{}:{}", self.name, self.mount_point)
    }
}

/// GPU usage. `simulated` marks the cosmetic sine-wave fallback used
/// when no real reading is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub usage_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub simulated: bool,
}

/// One network interface with cumulative counters.
///
/// Byte and packet counts are monotonically increasing since boot (or
/// interface creation); rates must be derived by differencing
/// successive readings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInterfaceInfo {
    pub name: String,
    pub up: bool,
    pub bytes_received: u64,
    pub bytes_transmitted: u64,
    pub packets_received: u64,
    pub packets_transmitted: u64,
    pub errors: u64,
    pub drops: u64,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
    pub last_updated_unix: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "cpu": {
                "usage_percent": 41.5,
                "frequency_mhz": 3600,
                "cores": 8,
                "brand": "Test CPU",
                "temperature": 55.0,
                "uptime_secs": 12345
            },
            "memory": {
                "total": 32000000000,
                "used": 9900000000,
                "available": 15900000000,
                "percentage": 62.0
            },
            "disks": [
                {
                    "name": "nvme0n1",
                    "mount_point": "/",
                    "total": 512000000000,
                    "used": 200000000000,
                    "available": 312000000000,
                    "percentage": 39.0
                }
            ],
            "gpu": { "usage_percent": 12.0, "simulated": true },
            "network": [
                {
                    "name": "eth0",
                    "up": true,
                    "bytes_received": 1000,
                    "bytes_transmitted": 500,
                    "packets_received": 10,
                    "packets_transmitted": 5,
                    "errors": 0,
                    "drops": 0,
                    "ip_addresses": ["192.168.1.2/24"],
                    "last_updated_unix": 1700000000
                }
            ]
        }"#;

        let snapshot: MetricSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.cpu.cores, 8);
        assert_eq!(snapshot.cpu.temperature, Some(55.0));
        assert_eq!(snapshot.disks.len(), 1);
        assert_eq!(snapshot.disks[0].entity_key(), "disk:nvme0n1:/");
        assert!(snapshot.gpu.simulated);
        assert_eq!(snapshot.network[0].bytes_received, 1000);
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let snapshot = MetricSnapshot::default();
        assert!(snapshot.disks.is_empty());
        assert!(snapshot.network.is_empty());
        assert_eq!(snapshot.cpu.usage_percent, 0.0);
    }
}
