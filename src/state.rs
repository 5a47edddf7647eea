//! Persisted view state.
//!
//! A small JSON file survives across launches so that re-entering the
//! dashboard restores the last-viewed category, the GPU simulation
//! keeps its phase, and the "reveal sensitive fields" preference
//! sticks. An explicit category request (CLI flag, alert jump)
//! overrides the stored value for that entry only - the stored
//! default changes only when the user switches tabs themselves.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::Category;

/// The persisted fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub last_category: Category,
    pub gpu_sim_tick: u64,
    pub reveal_sensitive: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            last_category: Category::Cpu,
            gpu_sim_tick: 0,
            reveal_sensitive: false,
        }
    }
}

/// Loads, mutates, and saves the view-state file.
#[derive(Debug)]
pub struct ViewStateStore {
    path: PathBuf,
    state: ViewState,
    /// Live GPU simulation counter, shared with the provider. Folded
    /// back into `state` on save.
    gpu_tick: Arc<AtomicU64>,
}

impl ViewStateStore {
    /// Load state from `path`. A missing or unreadable file yields
    /// the defaults; corruption is logged, never fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!("ignoring corrupt view state {}: {}", path.display(), e);
                    ViewState::default()
                }
            },
            Err(_) => ViewState::default(),
        };
        let gpu_tick = Arc::new(AtomicU64::new(state.gpu_sim_tick));
        Self {
            path,
            state,
            gpu_tick,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The shared GPU simulation counter, for the provider.
    pub fn gpu_tick(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.gpu_tick)
    }

    /// Resolve the startup category: an explicit request wins but is
    /// not persisted; otherwise the stored default.
    pub fn startup_category(&self, requested: Option<Category>) -> Category {
        requested.unwrap_or(self.state.last_category)
    }

    /// Record a manual tab switch and persist it.
    pub fn set_category(&mut self, category: Category) -> Result<()> {
        if self.state.last_category == category {
            return Ok(());
        }
        self.state.last_category = category;
        self.save()
    }

    /// Flip and persist the sensitive-fields preference. Returns the
    /// new value.
    pub fn toggle_reveal_sensitive(&mut self) -> Result<bool> {
        self.state.reveal_sensitive = !self.state.reveal_sensitive;
        self.save()?;
        Ok(self.state.reveal_sensitive)
    }

    pub fn reveal_sensitive(&self) -> bool {
        self.state.reveal_sensitive
    }

    /// Write the current state (including the live GPU tick) to disk.
    pub fn save(&mut self) -> Result<()> {
        self.state.gpu_sim_tick = self.gpu_tick.load(Ordering::Relaxed);
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing view state to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state_path(dir: &TempDir) -> PathBuf {
        dir.path().join("state.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ViewStateStore::load(state_path(&dir));
        assert_eq!(store.state().last_category, Category::Cpu);
        assert_eq!(store.state().gpu_sim_tick, 0);
        assert!(!store.reveal_sensitive());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);
        fs::write(&path, "not json").unwrap();
        let store = ViewStateStore::load(&path);
        assert_eq!(store.state().last_category, Category::Cpu);
    }

    #[test]
    fn test_category_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let mut store = ViewStateStore::load(&path);
        store.set_category(Category::Network).unwrap();

        let store = ViewStateStore::load(&path);
        assert_eq!(store.state().last_category, Category::Network);
    }

    #[test]
    fn test_explicit_request_overrides_without_persisting() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let mut store = ViewStateStore::load(&path);
        store.set_category(Category::Disks).unwrap();

        let store = ViewStateStore::load(&path);
        assert_eq!(store.startup_category(Some(Category::Network)), Category::Network);
        // The stored default is untouched.
        assert_eq!(store.state().last_category, Category::Disks);
    }

    #[test]
    fn test_gpu_tick_persists_through_shared_counter() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let mut store = ViewStateStore::load(&path);
        store.gpu_tick().fetch_add(17, Ordering::Relaxed);
        store.save().unwrap();

        let store = ViewStateStore::load(&path);
        assert_eq!(store.state().gpu_sim_tick, 17);
    }

    #[test]
    fn test_toggle_reveal_sensitive_persists() {
        let dir = TempDir::new().unwrap();
        let path = state_path(&dir);

        let mut store = ViewStateStore::load(&path);
        assert!(store.toggle_reveal_sensitive().unwrap());

        let store = ViewStateStore::load(&path);
        assert!(store.reveal_sensitive());
    }
}
