//! Best-effort append-only chat log stored as a JSON array.

use boog_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatLogEntry {
    pub timestamp: String,
    pub user: String,
    pub boog: String,
}

impl ChatLogEntry {
    pub fn now(user: &str, boog: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            user: user.to_string(),
            boog: boog.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-modify-write append; not safe against concurrent writers.
    pub fn append(&self, entry: &ChatLogEntry) -> Result<()> {
        let mut entries = self.read_all();
        entries.push(entry.clone());
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| Error::Log(e.to_string()))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&entries).map_err(|e| Error::Log(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| Error::Log(e.to_string()))
    }

    /// Missing or unreadable logs read as empty.
    pub fn read_all(&self) -> Vec<ChatLogEntry> {
        fs::read(&self.path)
            .ok()
            .and_then(|b| serde_json::from_slice(&b).ok())
            .unwrap_or_default()
    }

    /// Append and swallow failures.
    pub fn record(&self, user: &str, boog: &str) {
        if let Err(e) = self.append(&ChatLogEntry::now(user, boog)) {
            tracing::warn!(path = %self.path.display(), error = %e, "chat log write dropped");
        }
    }
}
