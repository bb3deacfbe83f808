//! Per-session transfer log
//!
//! The ledger collects a snapshot of every record the session touched, in plan
//! order, and writes them once to `<dir>/log_<timestamp>` as JSON Lines.

use crate::io::ledger_to_string;
use crate::types::{DisburseError, TransferRecord};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const MAX_NAME_ATTEMPTS: u32 = 100;

/// Session log file name for a given instant
///
/// ISO-8601 basic format with milliseconds and UTC offset, e.g.
/// `log_20261017T101500.123+0200`.
pub fn log_file_name(at: DateTime<Local>) -> String {
    format!("log_{}", at.format("%Y%m%dT%H%M%S%.3f%z"))
}

/// Append-only record of one session's transfers
#[derive(Debug, Default)]
pub struct SessionLedger {
    entries: Vec<TransferRecord>,
    flushed: Option<PathBuf>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `item`
    ///
    /// Ignored with a warning once the ledger has been flushed.
    pub fn record(&mut self, item: &TransferRecord) {
        if let Some(path) = &self.flushed {
            warn!(
                "Session log {} already written; not recording transfer to {}",
                path.display(),
                item.address
            );
            return;
        }
        self.entries.push(item.clone());
    }

    pub fn entries(&self) -> &[TransferRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed.is_some()
    }

    /// Write every entry to a new log file under `dir`
    ///
    /// The directory is created if missing. An existing file is never
    /// overwritten: if the timestamped name is taken, `-1`, `-2`, ... is
    /// appended.
    ///
    /// # Errors
    ///
    /// `PersistenceError` if the ledger was already flushed, or if the
    /// directory or file cannot be created or written. The in-memory entries
    /// are kept either way.
    pub async fn flush(&mut self, dir: &Path) -> Result<PathBuf, DisburseError> {
        let base = log_file_name(Local::now());
        let mut path = dir.join(&base);
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            match tokio::fs::try_exists(&path).await {
                Ok(false) => break,
                Ok(true) => {}
                Err(e) => {
                    // `create_new` in `flush_to` still refuses to overwrite
                    debug!("Cannot check whether {} exists: {}", path.display(), e);
                    break;
                }
            }
            path = dir.join(format!("{}-{}", base, attempt));
        }
        self.flush_to(&path).await
    }

    /// Write every entry to exactly `path`, which must not exist yet
    pub async fn flush_to(&mut self, path: &Path) -> Result<PathBuf, DisburseError> {
        if let Some(previous) = &self.flushed {
            return Err(DisburseError::persistence(
                path.display(),
                format!("session log already written to {}", previous.display()),
            ));
        }

        let contents = ledger_to_string(&self.entries)
            .map_err(|e| DisburseError::persistence(path.display(), e))?;
        write_new(path, &contents)
            .await
            .map_err(|e| DisburseError::persistence(path.display(), e))?;

        info!(
            outcome = "success",
            "Wrote {} entries to session log {}",
            self.entries.len(),
            path.display()
        );
        self.flushed = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }
}

async fn write_new(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}
