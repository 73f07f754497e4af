use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use podbridge_core::error::{BridgeError, Result};

use crate::config::LoggingSection;

/// Install the global subscriber: console plus optional file sink.
///
/// `RUST_LOG` wins over `logging.filter` when set.
pub fn init(cfg: &LoggingSection) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .map_err(|e| BridgeError::Config(format!("invalid logging.filter: {e}")))?;

    let file_layer = match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    BridgeError::Config(format!("open log file {} failed: {e}", path.display()))
                })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| BridgeError::Internal(format!("logging init failed: {e}")))
}
