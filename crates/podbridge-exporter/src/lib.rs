//! podbridge exporter library entry.
//!
//! Wires config, the snapshot store, the producer-driven collection loop and
//! the HTTP read path into one daemon. Consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app_state;
pub mod collector;
pub mod config;
pub mod obs;
pub mod ops;
pub mod producer;
pub mod router;
pub mod snapshot;
