//! Single file downloading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::download::state::DownloadedFile;
use crate::error::{Error, Result};
use crate::fs::destination_path;
use crate::output::Progress;
use crate::share::{open_retrying, ByteStream, RemoteLocation, RetryPolicy, ShareBackend};

/// Everything a download task needs, shared by all tasks of a run.
#[derive(Clone)]
pub struct DownloadContext {
    pub backend: Arc<dyn ShareBackend>,
    pub output_root: PathBuf,
    pub retry: RetryPolicy,
    pub progress: Progress,
}

impl DownloadContext {
    pub fn new(backend: Arc<dyn ShareBackend>, output_root: impl AsRef<Path>) -> Self {
        Self {
            backend,
            output_root: output_root.as_ref().to_path_buf(),
            retry: RetryPolicy::default(),
            progress: Progress::quiet(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

/// Download one remote file to `output_root/<basename>`.
///
/// Bytes are streamed into a hidden `.part` file next to the destination,
/// which replaces the destination only once the copy has completed. A failed
/// transfer leaves no partial file behind and any earlier copy untouched.
pub async fn download_file(
    ctx: &DownloadContext,
    location: &RemoteLocation,
) -> Result<DownloadedFile> {
    let output_path = destination_path(&ctx.output_root, location)?;

    let remote = open_retrying(ctx.backend.clone(), location.clone(), ctx.retry).await?;
    let total = remote.content_length;

    let (part_file, part_path) = tempfile::Builder::new()
        .prefix(".")
        .suffix(".part")
        .tempfile_in(&ctx.output_root)?
        .into_parts();
    let mut file = File::from_std(part_file);
    let progress = ctx.progress.file(&output_path);

    let copied = copy_with_progress(remote.body, &mut file, total, |done, total| {
        progress.update(done, total)
    })
    .await;
    drop(file);

    match copied {
        Ok(bytes) => {
            // Concurrent downloads of the same basename each rename their own
            // part file, so the last one to finish wins whole
            if let Err(e) = part_path.persist(&output_path) {
                progress.abandon();
                return Err(Error::Io(e.error));
            }
            progress.finish();
            tracing::debug!("Downloaded {} -> {}", location, output_path.display());
            Ok(DownloadedFile {
                location: location.clone(),
                path: output_path,
                bytes,
            })
        }
        Err(e) => {
            // Dropping the path removes the part file
            drop(part_path);
            progress.abandon();
            Err(e)
        }
    }
}

/// Copy a body into `writer`, calling `on_chunk(transferred, total)` after each chunk.
///
/// The writer is flushed before returning the number of bytes copied.
pub async fn copy_with_progress<W, F>(
    mut body: ByteStream,
    writer: &mut W,
    total: u64,
    mut on_chunk: F,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    F: FnMut(u64, u64),
{
    let mut transferred: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        transferred += chunk.len() as u64;
        on_chunk(transferred, total);
    }

    writer.flush().await?;
    Ok(transferred)
}
