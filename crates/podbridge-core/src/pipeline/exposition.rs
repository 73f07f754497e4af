//! Exposition text rendering.
//!
//! Two samples per entity, in input order, joined by `\n` with no trailing
//! newline:
//!
//! ```text
//! kube_pod_container_resource_cpu_usage_total{pod="web-1"} 0.25
//! kube_pod_container_resource_memory_usage_bytes{pod="web-1"} 134217728.0
//! ```
//!
//! Pod identities are inserted verbatim. An identity containing `"` or a
//! newline produces malformed output; producers are expected not to emit them.

use std::fmt::Write;

use super::normalize::NormalizedRecord;

pub const CPU_METRIC: &str = "kube_pod_container_resource_cpu_usage_total";
pub const MEMORY_METRIC: &str = "kube_pod_container_resource_memory_usage_bytes";

/// Format a sample value. Integral values keep one decimal place.
pub fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Render all records into exposition text.
pub fn render(records: &[NormalizedRecord]) -> String {
    let mut out = String::new();
    for r in records {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{CPU_METRIC}{{pod=\"{}\"}} {}\n{MEMORY_METRIC}{{pod=\"{}\"}} {}",
            r.identity,
            format_value(r.cpu_cores),
            r.identity,
            format_value(r.memory_bytes),
        );
    }
    out
}
