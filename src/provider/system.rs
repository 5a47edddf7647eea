//! sysinfo-backed snapshot provider.
//!
//! This is the real provider: it refreshes CPU and memory state in
//! place and re-enumerates disks and network interfaces on each
//! fetch. GPU usage has no portable probe, so a cosmetic simulated
//! reading is synthesised from a tick counter that persists across
//! sessions via the view-state store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{Components, Disks, Networks, System};

use super::{
    CpuMetrics, DiskMetrics, GpuMetrics, MemoryMetrics, MetricSnapshot, NetworkInterfaceInfo,
    ProviderError, SnapshotProvider,
};

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when the
/// denominator is zero.
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// Collects system metrics using the `sysinfo` crate.
pub struct SystemProvider {
    sys: System,
    /// Simulation tick shared with the view-state store so the GPU
    /// curve does not restart from the same phase every launch.
    gpu_tick: Arc<AtomicU64>,
    description: String,
}

impl fmt::Debug for SystemProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemProvider").field("description", &self.description).finish()
    }
}

impl SystemProvider {
    /// Create a provider with pre-initialized system data.
    ///
    /// `gpu_tick` is the persisted simulation counter; pass a fresh
    /// `Arc::default()` if persistence is not needed.
    pub fn new(gpu_tick: Arc<AtomicU64>) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys,
            gpu_tick,
            description: "local system (sysinfo)".to_string(),
        }
    }

    fn collect_cpu(&self) -> CpuMetrics {
        let cpus = self.sys.cpus();
        let usage_percent = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(sysinfo::Cpu::cpu_usage).sum::<f32>() / cpus.len() as f32
        };

        CpuMetrics {
            usage_percent,
            frequency_mhz: cpus.first().map(|c| c.frequency()).unwrap_or(0),
            cores: cpus.len(),
            brand: cpus.first().map(|c| c.brand().to_string()).unwrap_or_default(),
            temperature: cpu_temperature(),
            uptime_secs: System::uptime(),
        }
    }

    fn collect_memory(&self) -> MemoryMetrics {
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        MemoryMetrics {
            total,
            used,
            available: self.sys.available_memory(),
            percentage: safe_percent(used, total),
        }
    }

    fn collect_disks(&self) -> Vec<DiskMetrics> {
        let disks = Disks::new_with_refreshed_list();
        let mut out: Vec<DiskMetrics> = disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let available = disk.available_space();
                let used = total.saturating_sub(available);
                DiskMetrics {
                    name: disk.name().to_string_lossy().into_owned(),
                    mount_point: disk.mount_point().to_string_lossy().into_owned(),
                    total,
                    used,
                    available,
                    percentage: safe_percent(used, total),
                }
            })
            .collect();
        out.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
        out
    }

    fn collect_gpu(&self) -> GpuMetrics {
        // No portable GPU probe exists; synthesise a smooth curve from
        // the persisted tick so the panel is not frozen at zero.
        let tick = self.gpu_tick.fetch_add(1, Ordering::Relaxed);
        let usage = 60.0 + 40.0 * (tick as f64 / 8.0).sin();
        GpuMetrics {
            usage_percent: usage.clamp(0.0, 100.0).round(),
            vram_used: None,
            temperature: None,
            simulated: true,
        }
    }

    fn collect_network(&self) -> Vec<NetworkInterfaceInfo> {
        let networks = Networks::new_with_refreshed_list();
        let now_unix =
            SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);

        let mut out: Vec<NetworkInterfaceInfo> = networks
            .list()
            .iter()
            .map(|(name, data)| {
                let ip_addresses: Vec<String> = data
                    .ip_networks()
                    .iter()
                    .map(|ip| format!("{}/{}", ip.addr, ip.prefix))
                    .collect();
                let bytes_received = data.total_received();
                let bytes_transmitted = data.total_transmitted();
                NetworkInterfaceInfo {
                    name: name.clone(),
                    up: !ip_addresses.is_empty()
                        || bytes_received > 0
                        || bytes_transmitted > 0,
                    bytes_received,
                    bytes_transmitted,
                    packets_received: data.total_packets_received(),
                    packets_transmitted: data.total_packets_transmitted(),
                    errors: data.total_errors_on_received() + data.total_errors_on_transmitted(),
                    // Drop counts are not exposed portably.
                    drops: 0,
                    ip_addresses,
                    last_updated_unix: now_unix,
                }
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

/// Best-effort CPU temperature from the component sensor list.
fn cpu_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    components
        .list()
        .iter()
        .find(|c| {
            let label = c.label().to_lowercase();
            label.contains("cpu") || label.contains("core") || label.contains("package")
        })
        .map(|c| c.temperature())
        .filter(|t| t.is_finite())
}

impl SnapshotProvider for SystemProvider {
    fn fetch_snapshot(&mut self) -> Result<MetricSnapshot, ProviderError> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        if self.sys.cpus().is_empty() {
            return Err(ProviderError::Unavailable("no CPU data reported".to_string()));
        }

        Ok(MetricSnapshot {
            cpu: self.collect_cpu(),
            memory: self.collect_memory(),
            disks: self.collect_disks(),
            gpu: self.collect_gpu(),
            network: self.collect_network(),
        })
    }

    fn fetch_network_info(&mut self) -> Result<Vec<NetworkInterfaceInfo>, ProviderError> {
        Ok(self.collect_network())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
