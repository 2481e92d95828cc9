//! Run manifest: the sidecar record that makes a run auditable.

use std::path::{Path, PathBuf};

use nuject_core::{ErrorInfo, InjectError};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;

/// JSON sidecar written next to the event output.
///
/// Captures everything needed to reproduce or audit a run, and whether the
/// run completed. A manifest with `complete: false` (or no manifest at all)
/// marks the event file as partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Full configuration the run was executed with.
    pub config: RunConfig,
    /// Master seed in effect (after any CLI override).
    pub master_seed: u64,
    /// Optional seed label from the configuration.
    pub seed_label: Option<String>,
    /// Events actually generated and handed to the sink.
    pub events_generated: usize,
    /// Event output file the manifest describes.
    pub output_file: Option<PathBuf>,
    /// Whether the run reached its configured event count.
    pub complete: bool,
}

impl RunManifest {
    /// Serializes the manifest to pretty JSON at `path`.
    pub fn write(&self, path: &Path) -> Result<(), InjectError> {
        let text = serde_json::to_string_pretty(self).map_err(|err| {
            InjectError::Io(ErrorInfo::new("manifest-encode", err.to_string()))
        })?;
        std::fs::write(path, text).map_err(|err| {
            InjectError::Io(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest back from disk.
    pub fn load(path: &Path) -> Result<Self, InjectError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            InjectError::Io(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&text).map_err(|err| {
            InjectError::Io(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
