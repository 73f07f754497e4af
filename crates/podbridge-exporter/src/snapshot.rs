//! File-backed snapshot store.
//!
//! The collector is the only writer; HTTP handlers read concurrently.
//! `publish` writes a sibling temp file and renames it over the target, so a
//! reader sees either the previous snapshot or the new one in full.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use podbridge_core::error::{BridgeError, Result};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the snapshot with `text`.
    ///
    /// On failure the previous snapshot is left as it was.
    pub async fn publish(&self, text: &str) -> Result<()> {
        let tmp = self.temp_path();
        let res = write_then_rename(&tmp, &self.path, text).await;
        if res.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        res.map_err(|source| BridgeError::SnapshotWrite { path: self.path.clone(), source })
    }

    /// Current snapshot, `None` if nothing has been published yet.
    pub async fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BridgeError::SnapshotRead { path: self.path.clone(), source }),
        }
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

async fn write_then_rename(tmp: &Path, dest: &Path, text: &str) -> std::io::Result<()> {
    {
        let mut f = fs::File::create(tmp).await?;
        f.write_all(text.as_bytes()).await?;
        f.flush().await?;
        f.sync_all().await?;
    }
    fs::rename(tmp, dest).await
}
