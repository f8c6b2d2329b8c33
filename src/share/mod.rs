//! Storage-agnostic view of a remote file share.
//!
//! This module provides:
//! - Remote locations (share name + path segments)
//! - Directory listings
//! - The backend trait the download engine talks to
//! - A retrying byte stream for file bodies

pub mod backend;
pub mod location;
pub mod retry;

#[cfg(test)]
pub mod memory;

pub use backend::{ByteStream, DirectoryListing, RemoteFile, ShareBackend};
pub use location::RemoteLocation;
pub use retry::{open_retrying, RetryPolicy};
