//! Diff export - offer the generated payload as a file
//!
//! The host's key handler asks for a diff and hands it to the user as a
//! download; here that means writing it next to the session's working
//! directory (or wherever the host configures).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the payload is written into (created if missing)
    pub dir: PathBuf,
    /// File name of the payload
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            filename: "diff.json".to_string(),
        }
    }
}

/// Writes diff payloads to disk
pub struct DiffExporter {
    config: ExportConfig,
}

impl DiffExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Target path the next export will write to
    pub fn target_path(&self) -> PathBuf {
        self.config.dir.join(&self.config.filename)
    }

    /// Write a serialized payload, returning the path written
    pub fn export(&self, payload: &str) -> Result<PathBuf> {
        if !self.config.dir.as_os_str().is_empty() && !self.config.dir.exists() {
            std::fs::create_dir_all(&self.config.dir)?;
        }

        let path = self.target_path();
        std::fs::write(&path, payload)?;
        tracing::info!(path = %path.display(), bytes = payload.len(), "diff exported");
        Ok(path)
    }
}
