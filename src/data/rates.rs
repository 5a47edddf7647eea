//! Per-second rate derivation from cumulative counters.
//!
//! Network byte/packet counts are monotonic totals; the charts want
//! per-second rates. The calculator keeps one baseline per entity key
//! and differences successive readings against wall-clock time.

use std::collections::HashMap;
use std::time::Instant;

use crate::provider::NetworkInterfaceInfo;

/// Floor on the elapsed time used for differencing. Prevents division
/// blow-up when a tick re-enters faster than the nominal interval.
const MIN_ELAPSED_SECS: f64 = 0.5;

/// Derived per-second rates for one interface at one instant.
#[derive(Debug, Clone)]
pub struct RateSample {
    pub interface: String,
    pub rx_bytes_per_sec: f64,
    pub tx_bytes_per_sec: f64,
    pub sampled_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    value: u64,
    at: Instant,
}

/// Converts successive cumulative counter readings into rates.
///
/// Guarantees: output is always >= 0. The first observation of a key
/// yields 0. A counter that decreases (reset, interface replacement,
/// rollover) clamps to 0 for that one tick and resynchronises the
/// baseline, so a genuine reset costs a single under-read rather than
/// poisoning every later calculation.
#[derive(Debug, Clone, Default)]
pub struct RateCalculator {
    baselines: HashMap<String, Baseline>,
}

impl RateCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate for `key` given the current cumulative `value` at `now`.
    ///
    /// The stored baseline is updated unconditionally, including on a
    /// clamped negative delta.
    pub fn rate(&mut self, key: &str, value: u64, now: Instant) -> f64 {
        let previous = self.baselines.insert(key.to_string(), Baseline { value, at: now });

        let Some(prev) = previous else {
            return 0.0;
        };

        let elapsed = now.saturating_duration_since(prev.at).as_secs_f64().max(MIN_ELAPSED_SECS);
        if value >= prev.value {
            (value - prev.value) as f64 / elapsed
        } else {
            // CounterAnomaly: reset observed, clamp rather than go negative.
            0.0
        }
    }

    /// Derive rx/tx byte rates for one interface reading.
    pub fn sample_interface(&mut self, info: &NetworkInterfaceInfo, now: Instant) -> RateSample {
        let rx_key = format!("net:rx:{}", info.name);
        let tx_key = format!("net:tx:{}", info.name);
        RateSample {
            interface: info.name.clone(),
            rx_bytes_per_sec: self.rate(&rx_key, info.bytes_received, now),
            tx_bytes_per_sec: self.rate(&tx_key, info.bytes_transmitted, now),
            sampled_at: now,
        }
    }

    /// Number of tracked baselines (diagnostics/tests).
    pub fn tracked_entities(&self) -> usize {
        self.baselines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_sample_is_zero() {
        let mut calc = RateCalculator::new();
        let rate = calc.rate("eth0", 1000, Instant::now());
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_steady_rate() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.rate("eth0", 1000, t0);
        let rate = calc.rate("eth0", 3000, t0 + Duration::from_secs(1));
        assert!((rate - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counter_reset_clamps_and_resyncs() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.rate("eth0", 1000, t0);
        calc.rate("eth0", 3000, t0 + Duration::from_secs(1));

        // Reset: new value below the previous one.
        let rate = calc.rate("eth0", 500, t0 + Duration::from_secs(2));
        assert_eq!(rate, 0.0);

        // Baseline resynchronised to 500, so the next delta is sane.
        let rate = calc.rate("eth0", 1500, t0 + Duration::from_secs(3));
        assert!((rate - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_is_never_negative() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        let sequence = [100u64, 50, 200, 10, 10, 5000, 0];
        for (i, value) in sequence.iter().enumerate() {
            let rate = calc.rate("k", *value, t0 + Duration::from_secs(i as u64));
            assert!(rate >= 0.0, "negative rate for value {}", value);
        }
    }

    #[test]
    fn test_sub_tick_reentry_uses_elapsed_floor() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.rate("eth0", 0, t0);
        // 100ms later: elapsed floors to 0.5s, so 100 bytes -> 200 B/s.
        let rate = calc.rate("eth0", 100, t0 + Duration::from_millis(100));
        assert!((rate - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_independent_keys() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.rate("a", 100, t0);
        calc.rate("b", 9000, t0);
        let rate_a = calc.rate("a", 200, t0 + Duration::from_secs(1));
        let rate_b = calc.rate("b", 9000, t0 + Duration::from_secs(1));
        assert!((rate_a - 100.0).abs() < f64::EPSILON);
        assert_eq!(rate_b, 0.0);
        assert_eq!(calc.tracked_entities(), 2);
    }

    #[test]
    fn test_sample_interface_both_directions() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        let mut info = NetworkInterfaceInfo {
            name: "eth0".to_string(),
            bytes_received: 1000,
            bytes_transmitted: 400,
            ..NetworkInterfaceInfo::default()
        };
        calc.sample_interface(&info, t0);

        info.bytes_received = 3000;
        info.bytes_transmitted = 500;
        let sample = calc.sample_interface(&info, t0 + Duration::from_secs(1));
        assert_eq!(sample.interface, "eth0");
        assert!((sample.rx_bytes_per_sec - 2000.0).abs() < f64::EPSILON);
        assert!((sample.tx_bytes_per_sec - 100.0).abs() < f64::EPSILON);
    }
}
