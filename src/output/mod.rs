//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Per-file progress lines or bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{print_config_summary, print_error, print_info, print_success, print_warning};
pub use progress::{create_download_bar, FileProgress, Progress};
pub use stats::{format_bytes, print_backup_stats, print_failures};
