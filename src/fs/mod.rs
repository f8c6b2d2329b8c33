//! Filesystem module.
//!
//! Provides:
//! - Output root creation
//! - Destination path derivation and filename validation

pub mod naming;
pub mod paths;

pub use naming::sanitize_filename;
pub use paths::{destination_path, ensure_output_root};
