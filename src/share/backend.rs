//! Backend abstraction for remote file shares.
//!
//! The download engine only needs two capabilities from a share: list the
//! children of a directory, and open a byte stream for a file. Implementations
//! can talk to Azure Files, an emulator, or an in-memory fixture.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::share::location::RemoteLocation;

/// Body of a remote file as a stream of chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Entries directly under a remote directory, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

impl DirectoryListing {
    /// Append another page of results.
    pub fn extend(&mut self, other: DirectoryListing) {
        self.directories.extend(other.directories);
        self.files.extend(other.files);
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

/// An opened remote file.
pub struct RemoteFile {
    /// Number of bytes the body will yield from the requested offset.
    pub content_length: u64,
    pub body: ByteStream,
}

/// Abstract remote share.
#[async_trait]
pub trait ShareBackend: Send + Sync {
    /// List subdirectories and files directly under `location`.
    ///
    /// Implementations return every entry, following continuation markers.
    async fn list_directory(&self, location: &RemoteLocation) -> Result<DirectoryListing>;

    /// Open the file at `location`, starting at byte `offset`.
    async fn open_file(&self, location: &RemoteLocation, offset: u64) -> Result<RemoteFile>;
}
