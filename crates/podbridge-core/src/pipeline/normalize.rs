//! Unit normalization for CPU and memory quantities.
//!
//! CPU: `"<n>m"` is millicores, anything else whole cores.
//! Memory: `"<n>Mi"` is mebibytes, anything else raw bytes.
//! Unparseable values fall back to 0 and are counted, never surfaced as errors.

use super::extract::PodResourceRecord;

const MEBIBYTE: f64 = 1024.0 * 1024.0;

/// One entity with canonical units.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub identity: String,
    /// Cores, always >= 0.
    pub cpu_cores: f64,
    /// Bytes, always >= 0.
    pub memory_bytes: f64,
    /// Unix seconds at normalization time.
    pub observed_at: u64,
}

/// Result of normalizing one cycle's records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizeReport {
    pub records: Vec<NormalizedRecord>,
    pub cpu_fallbacks: usize,
    pub memory_fallbacks: usize,
}

/// Parse a CPU quantity into cores. `None` when the numeric part is invalid.
pub fn parse_cpu(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.strip_suffix('m') {
        Some(millis) => parse_quantity(millis).map(|v| v / 1000.0),
        None => parse_quantity(raw),
    }
}

/// Parse a memory quantity into bytes. `None` when the numeric part is invalid.
pub fn parse_memory(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.strip_suffix("Mi") {
        Some(mebi) => parse_quantity(mebi).map(|v| v * MEBIBYTE),
        None => parse_quantity(raw),
    }
}

fn parse_quantity(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// Normalize one record. Total: invalid values become 0.
pub fn normalize(record: &PodResourceRecord, observed_at: u64) -> NormalizedRecord {
    NormalizedRecord {
        identity: record.identity.clone(),
        cpu_cores: parse_cpu(&record.cpu_raw).unwrap_or(0.0),
        memory_bytes: parse_memory(&record.memory_raw).unwrap_or(0.0),
        observed_at,
    }
}

/// Normalize a batch, keeping order and counting fallbacks per field.
pub fn normalize_all(records: &[PodResourceRecord], observed_at: u64) -> NormalizeReport {
    let mut report = NormalizeReport {
        records: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for r in records {
        if parse_cpu(&r.cpu_raw).is_none() {
            report.cpu_fallbacks += 1;
            tracing::debug!(pod = %r.identity, cpu = %r.cpu_raw, "cpu value fell back to 0");
        }
        if parse_memory(&r.memory_raw).is_none() {
            report.memory_fallbacks += 1;
            tracing::debug!(
                pod = %r.identity,
                memory = %r.memory_raw,
                "memory value fell back to 0"
            );
        }
        report.records.push(normalize(r, observed_at));
    }

    report
}
