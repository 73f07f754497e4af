//! Shared error type across podbridge crates.

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage an error belongs to (stable labels for logs and diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Running the external producer.
    Producer,
    /// Reading the producer output file.
    Input,
    /// Parsing an embedded block.
    Extract,
    /// Publishing or reading the rendered snapshot.
    Snapshot,
    /// Clearing the producer output after a publish.
    Truncate,
    /// Loading or validating configuration.
    Config,
    /// Anything else.
    Internal,
}

impl Stage {
    /// String representation used in log fields and counter labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Producer => "producer",
            Stage::Input => "input",
            Stage::Extract => "extract",
            Stage::Snapshot => "snapshot",
            Stage::Truncate => "truncate",
            Stage::Config => "config",
            Stage::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("producer {program} failed to start: {source}")]
    ProducerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("producer {program} exited with {status}")]
    ProducerExit { program: String, status: String },
    #[error("producer {program} timed out after {secs}s")]
    ProducerTimeout { program: String, secs: u64 },
    #[error("input {path} unavailable: {source}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input {path} is empty")]
    InputEmpty { path: PathBuf },
    #[error("block parse failed: {0}")]
    BlockParse(String),
    #[error("snapshot write to {path} failed: {source}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot read from {path} failed: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("truncate of {path} failed: {source}")]
    Truncate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Map the error to the pipeline stage it came from.
    pub fn stage(&self) -> Stage {
        match self {
            BridgeError::ProducerSpawn { .. }
            | BridgeError::ProducerExit { .. }
            | BridgeError::ProducerTimeout { .. } => Stage::Producer,
            BridgeError::InputUnavailable { .. } | BridgeError::InputEmpty { .. } => Stage::Input,
            BridgeError::BlockParse(_) => Stage::Extract,
            BridgeError::SnapshotWrite { .. } | BridgeError::SnapshotRead { .. } => Stage::Snapshot,
            BridgeError::Truncate { .. } => Stage::Truncate,
            BridgeError::Config(_) | BridgeError::UnsupportedVersion => Stage::Config,
            BridgeError::Internal(_) => Stage::Internal,
        }
    }
}
