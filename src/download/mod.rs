//! Download module.
//!
//! This module provides:
//! - Single file downloading with progress reporting
//! - A bounded pool that tracks every dispatched download
//! - Remote directory traversal
//! - Backup run orchestration and statistics

pub mod backup;
pub mod file;
pub mod pool;
pub mod state;
pub mod traverse;

pub use backup::{run_backup, BackupRequest};
pub use file::{copy_with_progress, download_file, DownloadContext};
pub use pool::{DownloadPool, DEFAULT_CONCURRENCY};
pub use state::{BackupSummary, DownloadedFile, FileFailure};
pub use traverse::traverse;
