//! Internal collection diagnostics.
//!
//! Counters with dynamic labels backed by `DashMap`. Labels are flattened into
//! sorted key vectors to keep deterministic ordering. These counters are never
//! added to the `/metrics` response; they are read by tests and logged.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use podbridge_core::Stage;

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
        }
    }
}

/// How one collection cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot published (input may or may not have been cleared).
    Published,
    /// Conversion skipped or publish failed; previous snapshot still served.
    Stale,
}

impl CycleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleOutcome::Published => "published",
            CycleOutcome::Stale => "stale",
        }
    }
}

#[derive(Default)]
pub struct BridgeStats {
    pub cycles: CounterVec,
    pub stage_failures: CounterVec,
    pub rejected_blocks: CounterVec,
    pub normalization_fallbacks: CounterVec,
}

impl BridgeStats {
    pub fn record_cycle(&self, outcome: CycleOutcome) {
        self.cycles.inc(&[("outcome", outcome.as_str())]);
    }

    pub fn record_failure(&self, stage: Stage) {
        self.stage_failures.inc(&[("stage", stage.as_str())]);
    }

    pub fn record_conversion(
        &self,
        rejected_blocks: usize,
        cpu_fallbacks: usize,
        memory_fallbacks: usize,
    ) {
        if rejected_blocks > 0 {
            self.rejected_blocks.add(&[], rejected_blocks as u64);
        }
        if cpu_fallbacks > 0 {
            self.normalization_fallbacks.add(&[("field", "cpu")], cpu_fallbacks as u64);
        }
        if memory_fallbacks > 0 {
            self.normalization_fallbacks.add(&[("field", "memory")], memory_fallbacks as u64);
        }
    }

    /// Plain-text dump for logs.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.cycles.render("cycles", &mut out);
        self.stage_failures.render("stage_failures", &mut out);
        self.rejected_blocks.render("rejected_blocks", &mut out);
        self.normalization_fallbacks.render("normalization_fallbacks", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_does_not_matter() {
        let c = CounterVec::default();
        c.inc(&[("a", "1"), ("b", "2")]);
        c.inc(&[("b", "2"), ("a", "1")]);
        assert_eq!(c.get(&[("a", "1"), ("b", "2")]), 2);
        assert_eq!(c.get(&[("a", "9")]), 0);
    }

    #[test]
    fn render_lists_touched_counters() {
        let stats = BridgeStats::default();
        stats.record_cycle(CycleOutcome::Published);
        stats.record_failure(Stage::Producer);
        stats.record_conversion(2, 0, 3);

        let text = stats.render();
        assert!(text.contains("cycles{outcome=published} 1"));
        assert!(text.contains("stage_failures{stage=producer} 1"));
        assert!(text.contains("rejected_blocks{} 2"));
        assert!(text.contains("normalization_fallbacks{field=memory} 3"));
        assert!(!text.contains("field=cpu"));
    }
}
