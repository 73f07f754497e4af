//! Conversion pipeline (Extract -> Normalize -> Render).
//!
//! - Extract: pull JSON array blocks out of noisy producer output.
//! - Normalize: turn unit-suffixed quantities into cores and bytes.
//! - Render: emit exposition text, two samples per pod.
//!
//! Every stage is total over its input: malformed blocks are skipped and bad
//! quantities become 0, so a cycle always produces well-formed output.

pub mod exposition;
pub mod extract;
pub mod normalize;

pub use exposition::render;
pub use extract::{extract, Extraction, PodResourceRecord};
pub use normalize::{normalize, normalize_all, NormalizeReport, NormalizedRecord};

/// Output of one full conversion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub text: String,
    pub records: usize,
    pub rejected_blocks: usize,
    pub cpu_fallbacks: usize,
    pub memory_fallbacks: usize,
}

/// Run extract, normalize and render over raw producer output.
pub fn convert(raw: &str, observed_at: u64) -> Conversion {
    let extraction = extract(raw);
    let report = normalize_all(&extraction.records, observed_at);
    Conversion {
        text: render(&report.records),
        records: report.records.len(),
        rejected_blocks: extraction.rejected_blocks,
        cpu_fallbacks: report.cpu_fallbacks,
        memory_fallbacks: report.memory_fallbacks,
    }
}
