//! azurefileshare - back up files and directories from an Azure File Share.
//!
//! This library provides the pieces behind the `azurefileshare backup` command.
//!
//! # Features
//!
//! - Single file or recursive directory downloads
//! - Depth-first traversal with one listing request at a time
//! - Bounded concurrent transfers with a shared completion barrier
//! - Ranged resume of interrupted transfers with a per-file retry budget
//! - Shared Key authentication
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use azurefileshare::{
//!     run_backup, AzureFileClient, BackupRequest, Progress, RemoteLocation, SharedKeyCredential,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = SharedKeyCredential::new("myaccount", "a2V5")?;
//!     let client = AzureFileClient::new(credential, None)?;
//!
//!     let request = BackupRequest::new(RemoteLocation::new("backups", "photos"), true, "output/");
//!     let summary = run_backup(Arc::new(client), &request, Progress::quiet()).await?;
//!     println!("{} files", summary.files_downloaded());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod share;

// Re-exports for convenience
pub use api::{AzureFileClient, SharedKeyCredential};
pub use config::{Config, ProgressMode};
pub use download::{run_backup, traverse, BackupRequest, BackupSummary, DownloadPool};
pub use error::{Error, Result};
pub use output::Progress;
pub use share::{DirectoryListing, RemoteLocation, ShareBackend};
