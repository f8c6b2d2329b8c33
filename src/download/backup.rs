//! Backup run orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::download::file::DownloadContext;
use crate::download::pool::{DownloadPool, DEFAULT_CONCURRENCY};
use crate::download::state::BackupSummary;
use crate::download::traverse::traverse;
use crate::error::Result;
use crate::fs::ensure_output_root;
use crate::output::Progress;
use crate::share::{RemoteLocation, RetryPolicy, ShareBackend};

/// What to back up and where.
#[derive(Debug, Clone)]
pub struct BackupRequest {
    pub location: RemoteLocation,
    pub is_directory: bool,
    pub output_root: PathBuf,
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub fail_fast: bool,
}

impl BackupRequest {
    pub fn new(
        location: RemoteLocation,
        is_directory: bool,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            location,
            is_directory,
            output_root: output_root.into(),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            fail_fast: false,
        }
    }
}

/// Download a remote file or directory tree into the output root.
///
/// The output root is created before any transfer starts. Every dispatched
/// download has finished by the time this returns, including when the walk
/// fails; per-file failures are reported in the summary.
pub async fn run_backup(
    backend: Arc<dyn ShareBackend>,
    request: &BackupRequest,
    progress: Progress,
) -> Result<BackupSummary> {
    ensure_output_root(&request.output_root).await?;

    let context = DownloadContext::new(backend.clone(), &request.output_root)
        .with_retry(request.retry)
        .with_progress(progress);
    let mut pool = DownloadPool::new(context, request.concurrency, request.fail_fast);

    tracing::info!(
        "Backing up {} to {}",
        request.location,
        request.output_root.display()
    );

    let walked = traverse(
        backend.as_ref(),
        &request.location,
        request.is_directory,
        &mut pool,
    )
    .await;

    let in_flight = pool.in_flight();
    if in_flight > 0 {
        tracing::debug!("Waiting for {} download(s) to finish", in_flight);
    }
    let mut summary = pool.join_all().await;

    if let Err(e) = walked {
        // A failed inline download belongs in the summary, not the error path
        if request.is_directory {
            return Err(e);
        }
        summary.record_failure(Some(request.location.clone()), e);
    }

    Ok(summary)
}
