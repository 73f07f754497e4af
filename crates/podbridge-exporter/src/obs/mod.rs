//! Observability: log sinks and internal diagnostics.
//!
//! Logs go to the console and, when configured, to an append-only file.
//! Collection diagnostics are in-process counters that never leak into the
//! public exposition output.

pub mod logging;
pub mod stats;

pub use stats::{BridgeStats, CycleOutcome};
