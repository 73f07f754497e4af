//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use podbridge_core::error::{BridgeError, Result};

pub use schema::{
    BridgeConfig, CollectorSection, FilesSection, LoggingSection, ProducerSection, ServerSection,
};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| BridgeError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BridgeConfig> {
    let cfg: BridgeConfig =
        serde_yaml::from_str(s).map_err(|e| BridgeError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
///
/// Returns whether the defaults were used so the caller can log it once
/// logging is up.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<(BridgeConfig, bool)> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => Ok((load_from_file(path)?, false)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((BridgeConfig::default(), true)),
        Err(e) => Err(BridgeError::Config(format!("stat {} failed: {e}", path.display()))),
    }
}
