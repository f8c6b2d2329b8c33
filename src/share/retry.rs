//! Retrying file bodies.
//!
//! A transfer that fails mid-stream is resumed by re-opening the file at the
//! current offset, so bytes already handed to the caller are never fetched
//! twice. All re-opens, including retries of the initial open, share one
//! budget per file.

use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};

use crate::error::{Error, Result};
use crate::share::backend::{ByteStream, RemoteFile, ShareBackend};
use crate::share::location::RemoteLocation;

/// Default number of re-open attempts per file.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Retry budget and backoff for one file transfer.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << retry.saturating_sub(1).min(16))
    }
}

/// Open `location` and wrap its body so transient failures are retried.
///
/// The returned [`RemoteFile::content_length`] is the full file length.
pub async fn open_retrying(
    backend: Arc<dyn ShareBackend>,
    location: RemoteLocation,
    policy: RetryPolicy,
) -> Result<RemoteFile> {
    let mut retries_used = 0;

    let file = loop {
        match backend.open_file(&location, 0).await {
            Ok(file) => break file,
            Err(e) => match next_retry(&policy, &mut retries_used, e) {
                Ok(delay) => {
                    tracing::debug!(
                        "Retrying open of {} ({}/{})",
                        location,
                        retries_used,
                        policy.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            },
        }
    };

    let total = file.content_length;
    let state = RetryState {
        backend,
        location,
        body: Some(file.body),
        offset: 0,
        total,
        retries_used,
        policy,
        finished: false,
    };

    Ok(RemoteFile {
        content_length: total,
        body: retrying_body(state),
    })
}

/// Consume one unit of retry budget, or turn `error` into the final error.
fn next_retry(policy: &RetryPolicy, retries_used: &mut u32, error: Error) -> Result<Duration> {
    if !error.is_transient() {
        return Err(error);
    }

    if *retries_used >= policy.max_retries {
        return Err(if *retries_used == 0 {
            error
        } else {
            Error::RetriesExhausted {
                attempts: *retries_used + 1,
                source: Box::new(error),
            }
        });
    }

    *retries_used += 1;
    Ok(policy.delay_for(*retries_used))
}

struct RetryState {
    backend: Arc<dyn ShareBackend>,
    location: RemoteLocation,
    body: Option<ByteStream>,
    offset: u64,
    total: u64,
    retries_used: u32,
    policy: RetryPolicy,
    finished: bool,
}

fn retrying_body(state: RetryState) -> ByteStream {
    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            let failure = match state.body.take() {
                Some(mut body) => match body.next().await {
                    Some(Ok(chunk)) => {
                        state.offset += chunk.len() as u64;
                        state.body = Some(body);
                        return Some((Ok(chunk), state));
                    }
                    None if state.offset >= state.total => return None,
                    None => Error::Download(format!(
                        "stream for {} ended at byte {} of {}",
                        state.location, state.offset, state.total
                    )),
                    Some(Err(e)) => e,
                },
                None => match state.backend.open_file(&state.location, state.offset).await {
                    Ok(file) => {
                        state.body = Some(file.body);
                        continue;
                    }
                    Err(e) => e,
                },
            };

            match next_retry(&state.policy, &mut state.retries_used, failure) {
                Ok(delay) => {
                    tracing::warn!(
                        "Transfer of {} interrupted at byte {}, retrying ({}/{})",
                        state.location,
                        state.offset,
                        state.retries_used,
                        state.policy.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::memory::MemoryShare;

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    async fn collect(body: ByteStream) -> Result<Vec<u8>> {
        let mut body = body;
        let mut out = Vec::new();
        while let Some(chunk) = body.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn test_clean_stream_passes_through() {
        let share = Arc::new(MemoryShare::new("data").with_file("a.txt", b"hello world"));
        let loc = RemoteLocation::new("data", "a.txt");

        let file = open_retrying(share.clone(), loc, instant(3)).await.unwrap();
        assert_eq!(file.content_length, 11);
        assert_eq!(collect(file.body).await.unwrap(), b"hello world");
        assert_eq!(share.open_count("a.txt"), 1);
    }

    #[tokio::test]
    async fn test_resumes_from_offset_after_interruption() {
        let content: Vec<u8> = (0..100u8).collect();
        let share = Arc::new(
            MemoryShare::new("data")
                .with_chunk_size(10)
                .with_file("big.bin", &content)
                .interrupt_file("big.bin", 35),
        );
        let loc = RemoteLocation::new("data", "big.bin");

        let file = open_retrying(share.clone(), loc, instant(3)).await.unwrap();
        assert_eq!(collect(file.body).await.unwrap(), content);
        assert_eq!(share.open_count("big.bin"), 2);
        assert_eq!(share.last_offset("big.bin"), Some(30));
    }

    #[tokio::test]
    async fn test_initial_open_failures_use_budget() {
        let share = Arc::new(
            MemoryShare::new("data")
                .with_file("flaky.txt", b"ok")
                .flaky_file("flaky.txt", 2),
        );
        let loc = RemoteLocation::new("data", "flaky.txt");

        let file = open_retrying(share.clone(), loc, instant(3)).await.unwrap();
        assert_eq!(collect(file.body).await.unwrap(), b"ok");
        assert_eq!(share.open_count("flaky.txt"), 3);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_surfaces_error() {
        let share = Arc::new(
            MemoryShare::new("data")
                .with_file("flaky.txt", b"ok")
                .flaky_file("flaky.txt", 10),
        );
        let loc = RemoteLocation::new("data", "flaky.txt");

        let err = open_retrying(share.clone(), loc, instant(3))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(share.open_count("flaky.txt"), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let share = Arc::new(MemoryShare::new("data"));
        let loc = RemoteLocation::new("data", "missing.txt");

        let err = open_retrying(share.clone(), loc, instant(3))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Api { status: 404, .. }));
        assert_eq!(share.open_count("missing.txt"), 1);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }
}
