//! Backup run statistics.

use std::path::PathBuf;

use crate::error::Error;
use crate::share::RemoteLocation;

/// A file that finished transferring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub location: RemoteLocation,
    pub path: PathBuf,
    pub bytes: u64,
}

/// A file whose transfer failed.
#[derive(Debug)]
pub struct FileFailure {
    /// Remote location, when known.
    pub location: Option<RemoteLocation>,
    pub error: Error,
}

/// Outcome of a backup run.
#[derive(Debug, Default)]
pub struct BackupSummary {
    /// Completed files, in completion order.
    pub completed: Vec<DownloadedFile>,
    pub failures: Vec<FileFailure>,
    /// Tasks skipped or aborted after a failure in fail-fast mode.
    pub cancelled: u64,
}

impl BackupSummary {
    pub fn record_success(&mut self, file: DownloadedFile) {
        self.completed.push(file);
    }

    pub fn record_failure(&mut self, location: Option<RemoteLocation>, error: Error) {
        self.failures.push(FileFailure { location, error });
    }

    pub fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    pub fn files_downloaded(&self) -> u64 {
        self.completed.len() as u64
    }

    pub fn bytes_downloaded(&self) -> u64 {
        self.completed.iter().map(|f| f.bytes).sum()
    }

    pub fn files_failed(&self) -> u64 {
        self.failures.len() as u64
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled == 0
    }
}
