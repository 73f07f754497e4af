//! External producer invocation.
//!
//! The producer writes its data to the input file as a side effect. Exit code
//! and captured output are informational and only logged.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use podbridge_core::error::{BridgeError, Result};

use crate::config::ProducerSection;

const STDERR_TAIL_BYTES: usize = 512;

#[derive(Debug, Clone)]
pub struct Producer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Producer {
    pub fn from_config(cfg: &ProducerSection) -> Self {
        let script = cfg.script.to_string_lossy().into_owned();
        match &cfg.interpreter {
            Some(interp) => Self {
                program: interp.clone(),
                args: vec![script],
                timeout: cfg.timeout(),
            },
            None => Self {
                program: script,
                args: Vec::new(),
                timeout: cfg.timeout(),
            },
        }
    }

    /// Human-readable command line for logs.
    pub fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the producer to completion, bounded by the configured timeout.
    ///
    /// The child is killed if the timeout fires.
    pub async fn run(&self) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::ProducerSpawn { program: self.describe(), source })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(res) => res
                .map_err(|e| BridgeError::Internal(format!("wait for producer failed: {e}")))?,
            Err(_) => {
                return Err(BridgeError::ProducerTimeout {
                    program: self.describe(),
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.stdout.is_empty() {
            tracing::debug!(
                stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
                "producer stdout"
            );
        }

        if output.status.success() {
            Ok(())
        } else {
            tracing::warn!(stderr = %stderr_tail(&output.stderr), "producer stderr");
            Err(BridgeError::ProducerExit {
                program: self.describe(),
                status: output.status.to_string(),
            })
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&stderr[start..]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_script_through_bash() {
        let p = Producer::from_config(&ProducerSection::default());
        assert_eq!(p.describe(), "bash namespace.sh");
    }

    #[test]
    fn null_interpreter_runs_script_directly() {
        let cfg = ProducerSection { interpreter: None, ..Default::default() };
        let p = Producer::from_config(&cfg);
        assert_eq!(p.describe(), "namespace.sh");
        assert!(p.args.is_empty());
    }

    #[test]
    fn stderr_tail_keeps_last_bytes() {
        let long = vec![b'x'; STDERR_TAIL_BYTES + 10];
        assert_eq!(stderr_tail(&long).len(), STDERR_TAIL_BYTES);
        assert_eq!(stderr_tail(b"boom\n"), "boom");
    }
}
