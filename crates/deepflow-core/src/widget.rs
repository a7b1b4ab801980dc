//! Widget snapshot projection.
//!
//! The widget surface is an external collaborator that re-reads a small
//! shared file on its own schedule. The core's only obligation is to keep
//! the published snapshot consistent with the store immediately after
//! each mutation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;
use crate::storage::data_dir;

/// Minimal read-only projection of store state: a count and a
/// pre-formatted duration string, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub sessions_completed: u64,
    /// Pre-formatted focus total, e.g. "8h 30m".
    pub focus_time: String,
}

impl Default for WidgetSnapshot {
    fn default() -> Self {
        Self {
            sessions_completed: 0,
            focus_time: "0m".to_string(),
        }
    }
}

impl WidgetSnapshot {
    /// Read side, used by the widget surface independently of the store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Writes the snapshot to the shared location after each store mutation.
pub struct WidgetPublisher {
    path: PathBuf,
}

impl WidgetPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Publisher at the default shared location `<data_dir>/widget.json`.
    pub fn default_location() -> Result<Self, std::io::Error> {
        Ok(Self::new(data_dir()?.join("widget.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot. Failures are logged and swallowed -- the
    /// widget keeps showing the previous snapshot until the next
    /// successful publish.
    pub fn publish(&self, snapshot: &WidgetSnapshot) {
        match serde_json::to_string_pretty(snapshot) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!(
                        "failed to publish widget snapshot to {}: {e}",
                        self.path.display()
                    );
                }
            }
            Err(e) => warn!("failed to serialize widget snapshot: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");
        let publisher = WidgetPublisher::new(&path);
        let snapshot = WidgetSnapshot {
            sessions_completed: 12,
            focus_time: "8h 30m".to_string(),
        };
        publisher.publish(&snapshot);
        assert_eq!(WidgetSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn publish_to_unwritable_path_does_not_panic() {
        let publisher = WidgetPublisher::new("/nonexistent-dir/widget.json");
        publisher.publish(&WidgetSnapshot::default());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WidgetSnapshot::load(dir.path().join("missing.json")).is_err());
    }
}
