use crate::config::ExportMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub entries_processed: usize,
    pub files_exported: usize,
    pub bytes_written: u64,
    pub missing_entries: Vec<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl Default for ExportProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportProgress {
    pub fn new() -> Self {
        Self {
            entries_processed: 0,
            files_exported: 0,
            bytes_written: 0,
            missing_entries: Vec::new(),
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn add_file(&mut self, bytes: u64) {
        self.files_exported += 1;
        self.bytes_written += bytes;
    }

    pub fn finish_entry(&mut self) {
        self.entries_processed += 1;
    }

    pub fn add_missing<P: AsRef<Path>>(&mut self, path: P) {
        self.missing_entries.push(path.as_ref().display().to_string());
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Outcome of one export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub mode: ExportMode,
    pub base_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Index file (flatten) or combined document (combine).
    pub artifact_path: PathBuf,
    pub entries_processed: usize,
    pub files_exported: usize,
    pub bytes_written: u64,
    pub missing_entries: Vec<String>,
    pub errors: Vec<String>,
    pub duration: Duration,
    pub finished_at: DateTime<Utc>,
}

impl ExportReport {
    /// True when entries were missing or files were skipped.
    pub fn has_warnings(&self) -> bool {
        !self.missing_entries.is_empty() || !self.errors.is_empty()
    }
}
