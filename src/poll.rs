//! Polling scheduler and session state machine.
//!
//! A [`PollingScheduler`] owns the per-entity histories, the rate
//! calculator, the alert engine, and the notification log - it is the
//! only writer of all four. One [`PollingSession`] at a time drives
//! fetches: Idle until started, Active while a category is selected,
//! torn down on stop or category switch.
//!
//! Two contracts matter here:
//!
//! - Work is narrowed to the active category. A tick routes only the
//!   visible metric family through rates/history, so the dashboard
//!   does not pay for all five families every tick. Alert evaluation
//!   is the exception: it runs on every successful snapshot.
//! - Every session transition bumps a monotonically increasing token.
//!   A fetch that resolves after its session was torn down carries a
//!   stale token and is discarded at the apply step, never written.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::Category;
use crate::data::{
    ActiveAlert, AlertRule, AlertEngine, HistoryBuffer, HistoryStore, NotificationLog,
    RateCalculator, RateSample,
};
use crate::provider::{MetricSnapshot, NetworkInterfaceInfo, SnapshotProvider};

/// History key for the CPU usage series.
pub const KEY_CPU: &str = "cpu";
/// History key for the memory percentage series.
pub const KEY_MEMORY: &str = "memory";
/// History key for the GPU usage series.
pub const KEY_GPU: &str = "gpu";

/// History key for one direction of one interface.
pub fn net_key(direction: &str, interface: &str) -> String {
    format!("net:{}:{}", direction, interface)
}

/// Identifies one polling session. Compared at apply time to discard
/// results that resolve after their session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// Poll cadences. The full snapshot drives CPU/memory/GPU/disk and
/// alerting; network interfaces are fetched on their own, typically
/// slower, cadence.
#[derive(Debug, Clone, Copy)]
pub struct PollingIntervals {
    pub snapshot: Duration,
    pub network: Duration,
}

impl Default for PollingIntervals {
    fn default() -> Self {
        Self {
            snapshot: Duration::from_secs(2),
            network: Duration::from_secs(5),
        }
    }
}

/// An active polling session for one category.
#[derive(Debug)]
struct PollingSession {
    token: SessionToken,
    category: Category,
    last_snapshot_at: Option<Instant>,
    last_network_at: Option<Instant>,
}

/// Owns session lifecycle and all engine state derived from polling.
#[derive(Debug)]
pub struct PollingScheduler {
    intervals: PollingIntervals,
    session: Option<PollingSession>,
    next_token: u64,
    histories: HistoryStore,
    rates: RateCalculator,
    engine: AlertEngine,
    notifications: NotificationLog,
    latest: Option<MetricSnapshot>,
    interfaces: Vec<(NetworkInterfaceInfo, RateSample)>,
    last_updated: Option<Instant>,
}

impl PollingScheduler {
    pub fn new(intervals: PollingIntervals, rules: Vec<AlertRule>) -> Self {
        Self {
            intervals,
            session: None,
            next_token: 0,
            histories: HistoryStore::new(),
            rates: RateCalculator::new(),
            engine: AlertEngine::new(rules),
            notifications: NotificationLog::new(),
            latest: None,
            interfaces: Vec::new(),
            last_updated: None,
        }
    }

    /// Idle -> Active: begin a session for `category`.
    ///
    /// Histories and rate baselines are deliberately not reset; a
    /// category the user returns to resumes its frozen series.
    pub fn start(&mut self, category: Category) -> SessionToken {
        self.next_token += 1;
        let token = SessionToken(self.next_token);
        self.session = Some(PollingSession {
            token,
            category,
            last_snapshot_at: None,
            last_network_at: None,
        });
        debug!("polling session {:?} started for {}", token, category.label());
        token
    }

    /// Active -> Idle: tear the session down. Any in-flight fetch
    /// carrying the old token becomes a no-op at apply time.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("polling session {:?} stopped", session.token);
        }
    }

    /// Switch the active category, restarting the session (and
    /// invalidating the old token). No-op if already on `category`.
    pub fn set_category(&mut self, category: Category) {
        if self.session.as_ref().is_some_and(|s| s.category == category) {
            return;
        }
        self.stop();
        self.start(category);
    }

    pub fn is_polling(&self) -> bool {
        self.session.is_some()
    }

    pub fn category(&self) -> Option<Category> {
        self.session.as_ref().map(|s| s.category)
    }

    /// The current session's token, for callers that issue fetches
    /// themselves and apply the result later.
    pub fn current_token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|s| s.token)
    }

    /// Drive one tick: fetch whatever is due and apply it.
    ///
    /// Fetches here are synchronous, so a result can never outlive
    /// its session; the token round-trip still guards the apply path
    /// for callers that split fetch and apply.
    pub fn tick(&mut self, provider: &mut dyn SnapshotProvider, now: Instant) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let token = session.token;
        let category = session.category;
        let snapshot_due = session
            .last_snapshot_at
            .map_or(true, |t| now.saturating_duration_since(t) >= self.intervals.snapshot);
        let network_due = category == Category::Network
            && session
                .last_network_at
                .map_or(true, |t| now.saturating_duration_since(t) >= self.intervals.network);

        if snapshot_due {
            if let Some(s) = self.session.as_mut() {
                s.last_snapshot_at = Some(now);
            }
            match provider.fetch_snapshot() {
                Ok(snapshot) => {
                    self.apply_snapshot(token, snapshot, now);
                }
                Err(err) => warn!("snapshot fetch failed, skipping tick: {}", err),
            }
        }

        if network_due {
            if let Some(s) = self.session.as_mut() {
                s.last_network_at = Some(now);
            }
            match provider.fetch_network_info() {
                Ok(interfaces) => {
                    self.apply_network(token, interfaces, now);
                }
                Err(err) => warn!("network fetch failed, skipping tick: {}", err),
            }
        }
    }

    /// Force an immediate poll regardless of cadence.
    pub fn poll_now(&mut self, provider: &mut dyn SnapshotProvider, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.last_snapshot_at = None;
            session.last_network_at = None;
        }
        self.tick(provider, now);
    }

    /// Apply a fetched snapshot against the session identified by
    /// `token`. Returns false (writing nothing) when the token is
    /// stale or no session is active.
    pub fn apply_snapshot(
        &mut self,
        token: SessionToken,
        snapshot: MetricSnapshot,
        now: Instant,
    ) -> bool {
        let Some(session) = self.session.as_ref() else {
            debug!("discarding snapshot: no active session");
            return false;
        };
        if session.token != token {
            debug!("discarding snapshot from stale session {:?}", token);
            return false;
        }

        // Route only the active category's fields into history.
        match session.category {
            Category::Cpu => {
                self.histories.push(KEY_CPU, f64::from(snapshot.cpu.usage_percent));
            }
            Category::Memory => {
                self.histories.push(KEY_MEMORY, snapshot.memory.percentage);
            }
            Category::Gpu => {
                self.histories.push(KEY_GPU, snapshot.gpu.usage_percent);
            }
            Category::Disks => {
                for disk in &snapshot.disks {
                    self.histories.push(&disk.entity_key(), disk.percentage);
                }
            }
            Category::Network => {}
        }

        // Alerting always sees the full snapshot.
        if let Some(raised) = self.engine.observe(&snapshot) {
            self.notifications.push(&raised.message, raised.severity);
        }

        self.latest = Some(snapshot);
        self.last_updated = Some(now);
        true
    }

    /// Apply fetched interface readings: derive rates and extend the
    /// per-interface rx/tx histories. Token-guarded like
    /// [`apply_snapshot`](Self::apply_snapshot).
    pub fn apply_network(
        &mut self,
        token: SessionToken,
        mut interfaces: Vec<NetworkInterfaceInfo>,
        now: Instant,
    ) -> bool {
        let Some(session) = self.session.as_ref() else {
            debug!("discarding network info: no active session");
            return false;
        };
        if session.token != token {
            debug!("discarding network info from stale session {:?}", token);
            return false;
        }

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        self.interfaces = interfaces
            .into_iter()
            .map(|info| {
                let sample = self.rates.sample_interface(&info, now);
                self.histories.push(&net_key("rx", &info.name), sample.rx_bytes_per_sec);
                self.histories.push(&net_key("tx", &info.name), sample.tx_bytes_per_sec);
                (info, sample)
            })
            .collect();
        self.last_updated = Some(now);
        true
    }

    /// Most recent successfully applied snapshot.
    pub fn latest(&self) -> Option<&MetricSnapshot> {
        self.latest.as_ref()
    }

    /// Interfaces with derived rates, sorted by name.
    pub fn interfaces(&self) -> &[(NetworkInterfaceInfo, RateSample)] {
        &self.interfaces
    }

    pub fn active_alert(&self) -> Option<&ActiveAlert> {
        self.engine.active()
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationLog {
        &mut self.notifications
    }

    pub fn history(&self, key: &str) -> Option<&HistoryBuffer> {
        self.histories.series(key)
    }

    /// When the last successful apply happened (for "updated Xs ago").
    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_rules, AlertThresholds};
    use crate::provider::{CpuMetrics, MemoryMetrics, ProviderError};

    fn scheduler() -> PollingScheduler {
        PollingScheduler::new(
            PollingIntervals::default(),
            default_rules(AlertThresholds::default()),
        )
    }

    fn cpu_snapshot(usage: f32) -> MetricSnapshot {
        MetricSnapshot {
            cpu: CpuMetrics {
                usage_percent: usage,
                ..CpuMetrics::default()
            },
            memory: MemoryMetrics {
                percentage: 50.0,
                ..MemoryMetrics::default()
            },
            ..MetricSnapshot::default()
        }
    }

    /// Provider that serves a fixed snapshot and counts fetches.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        snapshot_fetches: usize,
        network_fetches: usize,
    }

    impl SnapshotProvider for ScriptedProvider {
        fn fetch_snapshot(&mut self) -> Result<MetricSnapshot, ProviderError> {
            self.snapshot_fetches += 1;
            Ok(cpu_snapshot(30.0))
        }

        fn fetch_network_info(&mut self) -> Result<Vec<NetworkInterfaceInfo>, ProviderError> {
            self.network_fetches += 1;
            Ok(vec![NetworkInterfaceInfo {
                name: "eth0".to_string(),
                bytes_received: 1000 * self.network_fetches as u64,
                ..NetworkInterfaceInfo::default()
            }])
        }

        fn description(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_idle_scheduler_does_nothing() {
        let mut sched = scheduler();
        let mut provider = ScriptedProvider::default();
        sched.tick(&mut provider, Instant::now());
        assert_eq!(provider.snapshot_fetches, 0);
        assert!(sched.latest().is_none());
    }

    #[test]
    fn test_tick_respects_snapshot_interval() {
        let mut sched = scheduler();
        let mut provider = ScriptedProvider::default();
        let t0 = Instant::now();

        sched.start(Category::Cpu);
        sched.tick(&mut provider, t0);
        assert_eq!(provider.snapshot_fetches, 1);

        // Within the interval: nothing fetched.
        sched.tick(&mut provider, t0 + Duration::from_millis(500));
        assert_eq!(provider.snapshot_fetches, 1);

        sched.tick(&mut provider, t0 + Duration::from_secs(2));
        assert_eq!(provider.snapshot_fetches, 2);
    }

    #[test]
    fn test_network_cadence_only_for_network_category() {
        let mut sched = scheduler();
        let mut provider = ScriptedProvider::default();
        let t0 = Instant::now();

        sched.start(Category::Cpu);
        sched.tick(&mut provider, t0);
        assert_eq!(provider.network_fetches, 0);

        sched.set_category(Category::Network);
        sched.tick(&mut provider, t0 + Duration::from_secs(3));
        assert_eq!(provider.network_fetches, 1);

        // Snapshot cadence (2s) fires again before network cadence (5s).
        sched.tick(&mut provider, t0 + Duration::from_secs(6));
        assert_eq!(provider.network_fetches, 1);
        sched.tick(&mut provider, t0 + Duration::from_secs(9));
        assert_eq!(provider.network_fetches, 2);
    }

    #[test]
    fn test_routing_narrows_to_active_category() {
        let mut sched = scheduler();
        let token = sched.start(Category::Cpu);

        sched.apply_snapshot(token, cpu_snapshot(30.0), Instant::now());

        assert!(sched.history(KEY_CPU).is_some());
        assert!(sched.history(KEY_MEMORY).is_none());
        assert!(sched.history(KEY_GPU).is_none());
    }

    #[test]
    fn test_category_switch_freezes_previous_history() {
        let mut sched = scheduler();
        let token = sched.start(Category::Cpu);
        let t0 = Instant::now();
        sched.apply_snapshot(token, cpu_snapshot(30.0), t0);
        sched.apply_snapshot(token, cpu_snapshot(40.0), t0 + Duration::from_secs(2));

        sched.set_category(Category::Memory);
        let token = sched.current_token().unwrap();
        sched.apply_snapshot(token, cpu_snapshot(99.0), t0 + Duration::from_secs(4));

        // CPU series kept its last pre-switch value; memory got written.
        assert_eq!(sched.history(KEY_CPU).unwrap().latest(), Some(40.0));
        assert_eq!(sched.history(KEY_MEMORY).unwrap().latest(), Some(50.0));
    }

    #[test]
    fn test_stale_token_apply_is_discarded() {
        let mut sched = scheduler();
        let token = sched.start(Category::Cpu);
        sched.stop();

        let applied = sched.apply_snapshot(token, cpu_snapshot(99.0), Instant::now());

        assert!(!applied);
        assert!(sched.latest().is_none());
        assert!(sched.history(KEY_CPU).is_none());
        assert!(sched.notifications().is_empty());
        assert!(sched.active_alert().is_none());
    }

    #[test]
    fn test_token_from_previous_session_is_discarded_after_switch() {
        let mut sched = scheduler();
        let old_token = sched.start(Category::Cpu);
        sched.set_category(Category::Memory);

        assert!(!sched.apply_snapshot(old_token, cpu_snapshot(30.0), Instant::now()));
        assert!(sched.history(KEY_MEMORY).is_none());
    }

    #[test]
    fn test_set_category_same_category_keeps_session() {
        let mut sched = scheduler();
        let token = sched.start(Category::Cpu);
        sched.set_category(Category::Cpu);
        assert_eq!(sched.current_token(), Some(token));
    }

    #[test]
    fn test_alert_raised_and_notified_on_snapshot() {
        let mut sched = scheduler();
        let token = sched.start(Category::Memory);

        sched.apply_snapshot(token, cpu_snapshot(95.0), Instant::now());

        assert_eq!(sched.active_alert().unwrap().message, "High CPU usage!");
        assert_eq!(sched.notifications().len(), 1);

        // Condition clears: alert gone, notification stays.
        sched.apply_snapshot(token, cpu_snapshot(10.0), Instant::now());
        assert!(sched.active_alert().is_none());
        assert_eq!(sched.notifications().len(), 1);
    }

    #[test]
    fn test_apply_network_derives_rates_and_history() {
        let mut sched = scheduler();
        let token = sched.start(Category::Network);
        let t0 = Instant::now();

        let iface = |rx: u64| {
            vec![NetworkInterfaceInfo {
                name: "eth0".to_string(),
                bytes_received: rx,
                ..NetworkInterfaceInfo::default()
            }]
        };

        sched.apply_network(token, iface(1000), t0);
        sched.apply_network(token, iface(3000), t0 + Duration::from_secs(1));

        let (_, sample) = &sched.interfaces()[0];
        assert!((sample.rx_bytes_per_sec - 2000.0).abs() < f64::EPSILON);
        assert_eq!(
            sched.history(&net_key("rx", "eth0")).unwrap().latest(),
            Some(2000.0)
        );

        // Counter reset clamps to zero.
        sched.apply_network(token, iface(500), t0 + Duration::from_secs(2));
        let (_, sample) = &sched.interfaces()[0];
        assert_eq!(sample.rx_bytes_per_sec, 0.0);
    }
}
