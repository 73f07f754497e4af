use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use podbridge_core::error::{BridgeError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    pub version: u32,

    #[serde(default)]
    pub producer: ProducerSection,

    #[serde(default)]
    pub files: FilesSection,

    #[serde(default)]
    pub collector: CollectorSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            producer: ProducerSection::default(),
            files: FilesSection::default(),
            collector: CollectorSection::default(),
            server: ServerSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BridgeError::UnsupportedVersion);
        }

        self.producer.validate()?;
        self.files.validate()?;
        self.collector.validate()?;
        self.server.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerSection {
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Program used to run the script; `null` executes the script directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProducerSection {
    fn default() -> Self {
        Self {
            script: default_script(),
            interpreter: default_interpreter(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProducerSection {
    pub fn validate(&self) -> Result<()> {
        if self.script.as_os_str().is_empty() {
            return Err(BridgeError::Config("producer.script must not be empty".into()));
        }
        if matches!(self.interpreter.as_deref(), Some("")) {
            return Err(BridgeError::Config(
                "producer.interpreter must be null or a program name".into(),
            ));
        }
        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(BridgeError::Config(
                "producer.timeout_secs must be between 1 and 3600".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

impl FilesSection {
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(BridgeError::Config("files.input and files.output must be set".into()));
        }
        if self.input == self.output {
            return Err(BridgeError::Config(
                "files.input and files.output must differ".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for CollectorSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl CollectorSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86400).contains(&self.interval_secs) {
            return Err(BridgeError::Config(
                "collector.interval_secs must be between 1 and 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(10..=60000).contains(&self.read_timeout_ms) {
            return Err(BridgeError::Config(
                "server.read_timeout_ms must be between 10 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| BridgeError::Config(format!("server.listen is not a socket address: {e}")))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Persistent log sink; `null` logs to the console only.
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,

    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_script() -> PathBuf {
    "namespace.sh".into()
}
fn default_interpreter() -> Option<String> {
    Some("bash".into())
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_input() -> PathBuf {
    "metric.json".into()
}
fn default_output() -> PathBuf {
    "metrics.prom".into()
}
fn default_interval_secs() -> u64 {
    15
}
fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_read_timeout_ms() -> u64 {
    2000
}
fn default_log_file() -> Option<PathBuf> {
    Some("metrics_collector.log".into())
}
fn default_log_filter() -> String {
    "info".into()
}
