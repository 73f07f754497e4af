//! Top-level facade crate for podbridge.
//!
//! Re-exports the pipeline primitives and the exporter daemon library so users
//! can depend on a single crate.

pub mod core {
    pub use podbridge_core::*;
}

pub mod exporter {
    pub use podbridge_exporter::*;
}
