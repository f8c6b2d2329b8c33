//! Bounded pool of concurrent download tasks.
//!
//! The pool doubles as the completion barrier for a run: every dispatched
//! task is tracked in one `JoinSet`, and [`DownloadPool::join_all`] returns
//! only once that set is empty.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::download::file::{download_file, DownloadContext};
use crate::download::state::{BackupSummary, DownloadedFile};
use crate::error::{Error, Result};
use crate::share::RemoteLocation;

/// Default number of files transferred at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

enum TaskOutcome {
    Done(DownloadedFile),
    Failed(RemoteLocation, Error),
    Skipped,
}

/// Dispatches download tasks and waits for them to finish.
pub struct DownloadPool {
    context: Arc<DownloadContext>,
    tasks: JoinSet<TaskOutcome>,
    permits: Arc<Semaphore>,
    fail_fast: bool,
    failed: Arc<AtomicBool>,
    dispatched: usize,
    summary: BackupSummary,
}

impl DownloadPool {
    /// Create a pool running at most `concurrency` transfers at once.
    ///
    /// With `fail_fast`, the first failed file stops every other transfer.
    pub fn new(context: DownloadContext, concurrency: usize, fail_fast: bool) -> Self {
        Self {
            context: Arc::new(context),
            tasks: JoinSet::new(),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            fail_fast,
            failed: Arc::new(AtomicBool::new(false)),
            dispatched: 0,
            summary: BackupSummary::default(),
        }
    }

    /// Schedule a file download without waiting for it.
    pub fn dispatch(&mut self, location: RemoteLocation) {
        if self.fail_fast && self.failed.load(Ordering::SeqCst) {
            tracing::debug!("Skipping {} after earlier failure", location);
            self.summary.record_cancelled();
            return;
        }

        let context = self.context.clone();
        let permits = self.permits.clone();
        let failed = self.failed.clone();
        let fail_fast = self.fail_fast;

        self.dispatched += 1;
        self.tasks.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return TaskOutcome::Skipped,
            };

            if fail_fast && failed.load(Ordering::SeqCst) {
                return TaskOutcome::Skipped;
            }

            match download_file(&context, &location).await {
                Ok(file) => TaskOutcome::Done(file),
                Err(e) => {
                    failed.store(true, Ordering::SeqCst);
                    TaskOutcome::Failed(location, e)
                }
            }
        });
    }

    /// Download a file on the caller's task, bypassing the pool.
    pub async fn download_inline(&mut self, location: &RemoteLocation) -> Result<()> {
        self.dispatched += 1;
        match download_file(&self.context, location).await {
            Ok(file) => {
                self.summary.record_success(file);
                Ok(())
            }
            Err(e) => {
                self.failed.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Tasks dispatched and not yet collected.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Files handed to the pool so far, including inline downloads.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Wait for every dispatched task and return the run summary.
    pub async fn join_all(mut self) -> BackupSummary {
        let mut aborted = false;

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Done(file)) => self.summary.record_success(file),
                Ok(TaskOutcome::Failed(location, e)) => {
                    tracing::warn!("Failed to download {}: {}", location, e);
                    self.summary.record_failure(Some(location), e);

                    if self.fail_fast && !aborted {
                        aborted = true;
                        self.tasks.abort_all();
                    }
                }
                Ok(TaskOutcome::Skipped) => self.summary.record_cancelled(),
                Err(e) if e.is_cancelled() => self.summary.record_cancelled(),
                Err(e) => self
                    .summary
                    .record_failure(None, Error::TaskAborted(e.to_string())),
            }
        }

        debug_assert_eq!(self.tasks.len(), 0);
        self.summary
    }
}
