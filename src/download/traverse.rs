//! Remote tree traversal.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::download::pool::DownloadPool;
use crate::error::{Error, Result};
use crate::share::{RemoteLocation, ShareBackend};

/// Hand every file at or under `location` to `pool`.
///
/// A single file (`is_directory == false`) is downloaded inline. For a
/// directory, subdirectories are walked depth-first in listing order, one
/// listing request at a time, and the directory's own files are dispatched
/// to the pool after its subdirectories. Listing errors stop the walk.
///
/// Returns once every file has been dispatched; call
/// [`DownloadPool::join_all`] to wait for the transfers.
pub async fn traverse(
    backend: &dyn ShareBackend,
    location: &RemoteLocation,
    is_directory: bool,
    pool: &mut DownloadPool,
) -> Result<()> {
    if is_directory {
        walk(backend, location.clone(), pool).await
    } else {
        pool.download_inline(location).await
    }
}

fn walk<'a>(
    backend: &'a dyn ShareBackend,
    location: RemoteLocation,
    pool: &'a mut DownloadPool,
) -> BoxFuture<'a, Result<()>> {
    async move {
        let listing = backend
            .list_directory(&location)
            .await
            .map_err(|e| Error::Listing {
                path: location.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(
            "{}: {} subdirectories, {} files",
            location,
            listing.directories.len(),
            listing.files.len()
        );

        for name in &listing.directories {
            walk(backend, location.child(name), &mut *pool).await?;
        }

        for name in &listing.files {
            pool.dispatch(location.child(name));
        }

        Ok(())
    }
    .boxed()
}
