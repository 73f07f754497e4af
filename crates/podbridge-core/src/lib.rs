//! podbridge core: the conversion pipeline and error types.
//!
//! This crate turns raw producer output into exposition text. It carries no
//! runtime, process or HTTP dependencies so the pipeline can be tested and
//! reused on its own.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed producer output degrades (skipped blocks, zero values) instead
//! of failing, so the collection loop never dies on bad input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod pipeline;

/// Shared result type.
pub use error::{BridgeError, Result, Stage};
