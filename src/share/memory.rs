//! In-memory share used by tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};

use crate::error::{Error, Result};
use crate::share::backend::{DirectoryListing, RemoteFile, ShareBackend};
use crate::share::location::RemoteLocation;

/// A share whose tree lives in memory, with hooks for injecting failures.
pub struct MemoryShare {
    share: String,
    dirs: HashMap<String, DirectoryListing>,
    files: HashMap<String, Vec<u8>>,
    chunk_size: usize,
    broken_dirs: HashSet<String>,
    broken_files: HashSet<String>,
    flaky: Mutex<HashMap<String, u32>>,
    interrupts: Mutex<HashMap<String, usize>>,
    delays: HashMap<String, Duration>,
    opens: Mutex<HashMap<String, Vec<u64>>>,
    active_opens: AtomicUsize,
    peak_opens: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryShare {
    pub fn new(share: &str) -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(String::new(), DirectoryListing::default());
        Self {
            share: share.to_string(),
            dirs,
            files: HashMap::new(),
            chunk_size: 4,
            broken_dirs: HashSet::new(),
            broken_files: HashSet::new(),
            flaky: Mutex::new(HashMap::new()),
            interrupts: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            opens: Mutex::new(HashMap::new()),
            active_opens: AtomicUsize::new(0),
            peak_opens: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Add a directory (and its ancestors) in listing order.
    pub fn with_dir(mut self, path: &str) -> Self {
        self.ensure_dir(&RemoteLocation::new(&self.share, path));
        self
    }

    /// Add a file, creating parent directories as needed.
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        let loc = RemoteLocation::new(&self.share, path);
        let parent = RemoteLocation::new(&self.share, &parent_path(&loc));
        self.ensure_dir(&parent);

        let name = loc.name().unwrap_or_default().to_string();
        let listing = self.dirs.entry(parent.path()).or_default();
        if !listing.files.contains(&name) {
            listing.files.push(name);
        }
        self.files.insert(loc.path(), content.to_vec());
        self
    }

    /// Listing `path` fails with a server error.
    pub fn fail_listing(mut self, path: &str) -> Self {
        self.broken_dirs
            .insert(RemoteLocation::new(&self.share, path).path());
        self
    }

    /// Every open of `path` fails with a permanent error.
    pub fn fail_file(mut self, path: &str) -> Self {
        self.broken_files
            .insert(RemoteLocation::new(&self.share, path).path());
        self
    }

    /// The first `failures` opens of `path` fail with a transient error.
    pub fn flaky_file(self, path: &str, failures: u32) -> Self {
        self.flaky
            .lock()
            .unwrap()
            .insert(RemoteLocation::new(&self.share, path).path(), failures);
        self
    }

    /// The first body of `path` breaks once more than `after_bytes` would be sent.
    pub fn interrupt_file(self, path: &str, after_bytes: usize) -> Self {
        self.interrupts
            .lock()
            .unwrap()
            .insert(RemoteLocation::new(&self.share, path).path(), after_bytes);
        self
    }

    /// Opening `path` takes `delay`.
    pub fn delay_file(mut self, path: &str, delay: Duration) -> Self {
        self.delays
            .insert(RemoteLocation::new(&self.share, path).path(), delay);
        self
    }

    pub fn open_count(&self, path: &str) -> usize {
        let key = RemoteLocation::new(&self.share, path).path();
        self.opens
            .lock()
            .unwrap()
            .get(&key)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn last_offset(&self, path: &str) -> Option<u64> {
        let key = RemoteLocation::new(&self.share, path).path();
        self.opens
            .lock()
            .unwrap()
            .get(&key)
            .and_then(|offsets| offsets.last().copied())
    }

    /// Highest number of opens observed running at the same time.
    pub fn peak_concurrent_opens(&self) -> usize {
        self.peak_opens.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn ensure_dir(&mut self, loc: &RemoteLocation) {
        let mut current = RemoteLocation::root(self.share.clone());
        for segment in loc.segments() {
            let parent = self.dirs.entry(current.path()).or_default();
            if !parent.directories.contains(segment) {
                parent.directories.push(segment.clone());
            }
            current = current.child(segment);
            self.dirs.entry(current.path()).or_default();
        }
    }

    fn not_found(location: &RemoteLocation) -> Error {
        Error::Api {
            status: 404,
            code: "ResourceNotFound".to_string(),
            url: location.to_string(),
        }
    }
}

fn parent_path(loc: &RemoteLocation) -> String {
    let segments = loc.segments();
    segments[..segments.len().saturating_sub(1)].join("/")
}

#[async_trait]
impl ShareBackend for MemoryShare {
    async fn list_directory(&self, location: &RemoteLocation) -> Result<DirectoryListing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let key = location.path();

        if self.broken_dirs.contains(&key) {
            return Err(Error::Api {
                status: 500,
                code: "InternalError".to_string(),
                url: location.to_string(),
            });
        }

        self.dirs
            .get(&key)
            .cloned()
            .ok_or_else(|| Self::not_found(location))
    }

    async fn open_file(&self, location: &RemoteLocation, offset: u64) -> Result<RemoteFile> {
        let key = location.path();
        self.opens
            .lock()
            .unwrap()
            .entry(key.clone())
            .or_default()
            .push(offset);

        let active = self.active_opens.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_opens.fetch_max(active, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        self.active_opens.fetch_sub(1, Ordering::SeqCst);

        if self.broken_files.contains(&key) {
            return Err(Error::Api {
                status: 403,
                code: "AuthorizationFailure".to_string(),
                url: location.to_string(),
            });
        }

        {
            let mut flaky = self.flaky.lock().unwrap();
            if let Some(remaining) = flaky.get_mut(&key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(Error::Download("simulated connection reset".to_string()));
                }
            }
        }

        let content = self
            .files
            .get(&key)
            .ok_or_else(|| Self::not_found(location))?;
        let start = (offset as usize).min(content.len());
        let rest = &content[start..];

        let mut chunks: Vec<Result<Bytes>> = Vec::new();
        let interrupt = self.interrupts.lock().unwrap().remove(&key);
        let mut sent = 0;
        for chunk in rest.chunks(self.chunk_size) {
            if let Some(limit) = interrupt {
                if sent + chunk.len() > limit {
                    chunks.push(Err(Error::Download("simulated broken pipe".to_string())));
                    break;
                }
            }
            sent += chunk.len();
            chunks.push(Ok(Bytes::copy_from_slice(chunk)));
        }

        Ok(RemoteFile {
            content_length: rest.len() as u64,
            body: stream::iter(chunks).boxed(),
        })
    }
}
