//! Rolling-window history for charting.
//!
//! Each monitored entity (the CPU, a disk, one direction of one
//! network interface) gets a fixed-length FIFO of recent samples that
//! the chart widgets render as a trailing-60 window.

use std::collections::HashMap;
use std::collections::VecDeque;

/// Number of samples each buffer holds. Matches the "last 60 seconds"
/// window the charts advertise at a 1-2s poll cadence.
pub const HISTORY_CAPACITY: usize = 60;

/// Fixed-capacity sliding window of samples.
///
/// The buffer is seeded uniformly with the first observed value so a
/// freshly appearing entity does not render a misleading ramp up from
/// zero. Once seeded, the length is always exactly the capacity;
/// every push drops the oldest sample.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Create an empty buffer with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty buffer with a custom capacity (tests).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, seeding the whole window on first use.
    pub fn push(&mut self, value: f64) {
        if self.samples.is_empty() {
            self.seed(value);
            return;
        }
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Fill the entire window with one value.
    pub fn seed(&mut self, value: f64) {
        self.samples.clear();
        self.samples.extend(std::iter::repeat(value).take(self.capacity));
    }

    /// Reset the window to all zeros.
    pub fn clear(&mut self) {
        self.seed(0.0);
    }

    /// Whether any sample has been recorded yet.
    pub fn is_warmed(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Samples as u64, oldest-first, for sparkline widgets. Negative
    /// values clamp to zero.
    pub fn as_sparkline(&self) -> Vec<u64> {
        self.samples.iter().map(|v| if *v > 0.0 { v.round() as u64 } else { 0 }).collect()
    }
}

/// Per-entity history buffers, keyed by stable identity strings like
/// `cpu`, `disk:<name>:<mount>`, or `net:rx:<iface>`.
///
/// Entities that disappear from a snapshot keep their buffers, so a
/// re-appearing disk or interface resumes its series instead of
/// restarting from empty. At dashboard scale (tens of entities) the
/// retention is acceptable.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    buffers: HashMap<String, HistoryBuffer>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample for `key`, creating a seeded buffer on first
    /// observation of the entity.
    pub fn push(&mut self, key: &str, value: f64) {
        self.buffers.entry(key.to_string()).or_default().push(value);
    }

    /// The series for an entity, if it has ever been observed.
    pub fn series(&self, key: &str) -> Option<&HistoryBuffer> {
        self.buffers.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.buffers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_push_seeds_full_window() {
        let mut buffer = HistoryBuffer::new();
        assert!(!buffer.is_warmed());

        buffer.push(42.0);

        assert_eq!(buffer.len(), HISTORY_CAPACITY);
        assert!(buffer.iter().all(|v| v == 42.0));
    }

    #[test]
    fn test_length_is_constant_after_warmup() {
        let mut buffer = HistoryBuffer::new();
        for i in 0..200 {
            buffer.push(i as f64);
            assert_eq!(buffer.len(), HISTORY_CAPACITY);
        }
    }

    #[test]
    fn test_push_keeps_last_n_in_order() {
        let mut buffer = HistoryBuffer::with_capacity(4);
        for i in 1..=10 {
            buffer.push(f64::from(i));
        }
        // 1 seeded the window; 2..=10 then rolled through it.
        let values: Vec<f64> = buffer.iter().collect();
        assert_eq!(values, vec![7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_clear_zero_fills() {
        let mut buffer = HistoryBuffer::with_capacity(3);
        buffer.push(5.0);
        buffer.clear();
        assert_eq!(buffer.len(), 3);
        assert!(buffer.iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_latest() {
        let mut buffer = HistoryBuffer::with_capacity(3);
        assert_eq!(buffer.latest(), None);
        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.latest(), Some(2.0));
    }

    #[test]
    fn test_sparkline_clamps_negatives() {
        let mut buffer = HistoryBuffer::with_capacity(2);
        buffer.push(-5.0);
        buffer.push(3.4);
        assert_eq!(buffer.as_sparkline(), vec![0, 3]);
    }

    #[test]
    fn test_store_retains_disappeared_entities() {
        let mut store = HistoryStore::new();
        store.push("disk:sda:/", 40.0);
        store.push("disk:sdb:/data", 10.0);

        // "sdb" disappears from later snapshots; its series survives.
        store.push("disk:sda:/", 41.0);
        assert!(store.contains("disk:sdb:/data"));
        assert_eq!(store.series("disk:sdb:/data").unwrap().latest(), Some(10.0));
        assert_eq!(store.series("disk:sda:/").unwrap().latest(), Some(41.0));
    }
}
