//! Collection loop.
//!
//! One cycle: run producer -> read input -> convert -> publish snapshot ->
//! clear input. Every stage is fault-isolated: a failure is logged and counted,
//! and the loop keeps its fixed cadence (no backoff, no jitter).

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use podbridge_core::error::{BridgeError, Result, Stage};
use podbridge_core::pipeline::convert;

use crate::config::BridgeConfig;
use crate::obs::{BridgeStats, CycleOutcome};
use crate::producer::Producer;
use crate::snapshot::SnapshotStore;

/// What happened during one cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub producer_ok: bool,
    /// `false` when the input file was missing, unreadable or blank and conversion was skipped.
    pub converted: bool,
    pub records: usize,
    pub rejected_blocks: usize,
    pub fallbacks: usize,
    pub published: bool,
    pub input_cleared: bool,
}

pub struct Collector {
    producer: Producer,
    input: PathBuf,
    store: SnapshotStore,
    interval: Duration,
    stats: Arc<BridgeStats>,
}

impl Collector {
    pub fn new(cfg: &BridgeConfig, store: SnapshotStore, stats: Arc<BridgeStats>) -> Self {
        Self {
            producer: Producer::from_config(&cfg.producer),
            input: cfg.files.input.clone(),
            store,
            interval: cfg.collector.interval(),
            stats,
        }
    }

    /// Run one full cycle. Never fails; the report says how far it got.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        match self.producer.run().await {
            Ok(()) => {
                report.producer_ok = true;
                tracing::info!(producer = %self.producer.describe(), "producer finished");
            }
            Err(e) => self.fail(&e, "producer run failed"),
        }

        let raw = match self.read_input().await {
            Ok(raw) => raw,
            Err(e) => {
                self.fail(&e, "input unavailable, keeping previous snapshot");
                self.stats.record_cycle(CycleOutcome::Stale);
                return report;
            }
        };

        let conversion = convert(&raw, unix_now());
        report.converted = true;
        report.records = conversion.records;
        report.rejected_blocks = conversion.rejected_blocks;
        report.fallbacks = conversion.cpu_fallbacks + conversion.memory_fallbacks;
        self.stats.record_conversion(
            conversion.rejected_blocks,
            conversion.cpu_fallbacks,
            conversion.memory_fallbacks,
        );
        if conversion.rejected_blocks > 0 {
            self.stats.record_failure(Stage::Extract);
        }

        if let Err(e) = self.store.publish(&conversion.text).await {
            self.fail(&e, "snapshot publish failed, keeping previous snapshot");
            self.stats.record_cycle(CycleOutcome::Stale);
            return report;
        }
        report.published = true;
        tracing::info!(
            records = conversion.records,
            path = %self.store.path().display(),
            "converted pod metrics"
        );

        match self.clear_input().await {
            Ok(()) => {
                report.input_cleared = true;
                tracing::info!(path = %self.input.display(), "cleared input file");
            }
            Err(e) => self.fail(&e, "cannot clear input file"),
        }

        self.stats.record_cycle(CycleOutcome::Published);
        report
    }

    /// Loop until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// The first cycle starts immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            producer = %self.producer.describe(),
            "collector started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let report = self.run_cycle().await;
            tracing::debug!(?report, "cycle done");

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(stats = %self.stats.render(), "collector stopped");
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> CollectorHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        CollectorHandle { stop_tx, task: tokio::spawn(self.run(stop_rx)) }
    }

    /// Read the producer output. Invalid UTF-8 in the noise is replaced, not
    /// rejected; an empty or blank file counts as no new data.
    async fn read_input(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.input)
            .await
            .map_err(|source| BridgeError::InputUnavailable { path: self.input.clone(), source })?;
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        if raw.trim().is_empty() {
            return Err(BridgeError::InputEmpty { path: self.input.clone() });
        }
        Ok(raw)
    }

    async fn clear_input(&self) -> Result<()> {
        // truncate in place; the producer may hold the path open across runs
        let res = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.input)
            .await;
        match res {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BridgeError::Truncate { path: self.input.clone(), source }),
        }
    }

    fn fail(&self, err: &BridgeError, msg: &str) {
        let stage = err.stage();
        self.stats.record_failure(stage);
        tracing::error!(stage = stage.as_str(), error = %err, "{msg}");
    }
}

/// Handle to a spawned collector loop.
pub struct CollectorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CollectorHandle {
    /// Signal shutdown and wait for the current cycle to finish.
    ///
    /// Returns `false` if the task ended abnormally (panic or abort).
    pub async fn stop(self) -> bool {
        let _ = self.stop_tx.send(true);
        report_exit(self.task.await)
    }
}

fn report_exit(res: std::result::Result<(), JoinError>) -> bool {
    match res {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "collector task failed");
            false
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicked_task_is_reported() {
        let task = tokio::spawn(async { panic!("boom") });
        assert!(!report_exit(task.await));

        let task = tokio::spawn(async {});
        assert!(report_exit(task.await));
    }
}
