//! File-based data source.
//!
//! Polls a JSON file for fleet data.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{DataSource, FleetPayload, FleetSnapshot};

/// A data source that reads fleet data from a JSON file.
///
/// The file holds either a bare array of robot rows, as returned by
/// `GET /api/robots`, or an object with `robots`, `joints` and `telemetry`.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    version: u64,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            version: 0,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<FleetPayload> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|content| {
                FleetPayload::parse(&content).map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(payload) => {
                self.last_error = None;
                Some(payload)
            }
            Err(message) => {
                warn!(path = %self.path.display(), "{}", message);
                self.last_error = Some(message);
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<FleetSnapshot> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let payload = self.read_file()?;
        self.last_modified = current_modified;
        self.version += 1;
        debug!(
            path = %self.path.display(),
            version = self.version,
            robots = payload.robots.len(),
            "loaded fleet file"
        );
        Some(payload.into_snapshot(self.version))
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"[
            {"id": "RBT-001", "name": "Atlas", "status": "online", "battery": 85},
            {"id": "RBT-002", "name": "Helios", "status": "error", "battery": null}
        ]"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/fleet.json");
        assert_eq!(source.path(), Path::new("/tmp/fleet.json"));
        assert_eq!(source.description(), "file: /tmp/fleet.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.robots.len(), 2);
        assert_eq!(snapshot.robots[1].battery, 0.0);

        // Unchanged file: nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let first = source.poll().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(file, r#"{{"robots": [{{"id": "RBT-009"}}]}}"#).unwrap();
        file.flush().unwrap();

        // Filesystems with coarse mtime resolution may not see the change.
        if let Some(second) = source.poll() {
            assert!(second.version > first.version);
            assert_eq!(second.robots[0].id, "RBT-009");
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/fleet.json");

        assert!(source.poll().is_none());
        let error = source.error().unwrap();
        assert!(error.contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_failed_read_keeps_version() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[]").unwrap();
        let mut source = FileSource::new(file.path());
        assert_eq!(source.poll().unwrap().version, 1);

        let path = file.path().to_path_buf();
        drop(file);
        assert!(source.poll().is_none());
        assert!(!path.exists());
        assert_eq!(source.version, 1);
    }
}
