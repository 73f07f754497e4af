//! Shared application state for the exporter.
//!
//! Built once from the loaded config and handed to both the collector and the
//! HTTP router; there are no process-wide globals besides the log subscriber.

use std::sync::Arc;

use crate::collector::Collector;
use crate::config::BridgeConfig;
use crate::obs::BridgeStats;
use crate::snapshot::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    stats: Arc<BridgeStats>,
}

struct AppStateInner {
    cfg: BridgeConfig,
    store: SnapshotStore,
}

impl AppState {
    pub fn new(cfg: BridgeConfig) -> Self {
        let store = SnapshotStore::new(cfg.files.output.clone());
        Self {
            inner: Arc::new(AppStateInner { cfg, store }),
            stats: Arc::new(BridgeStats::default()),
        }
    }

    pub fn cfg(&self) -> &BridgeConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    pub fn stats(&self) -> Arc<BridgeStats> {
        Arc::clone(&self.stats)
    }

    /// Collector sharing this state's store and diagnostics.
    pub fn collector(&self) -> Collector {
        Collector::new(self.cfg(), self.store().clone(), self.stats())
    }
}
