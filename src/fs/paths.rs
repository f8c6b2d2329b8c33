//! Output root and destination paths.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_filename;
use crate::share::RemoteLocation;

/// Local destination for a remote file: `output_root/<basename>`.
///
/// The output namespace is flat, so files with the same basename in
/// different remote directories map to the same path.
pub fn destination_path(output_root: &Path, location: &RemoteLocation) -> Result<PathBuf> {
    let name = location.name().ok_or_else(|| {
        Error::InvalidFilename(format!("'{}' does not name a file", location))
    })?;

    Ok(output_root.join(sanitize_filename(name)?))
}

/// Create the output root (and parents) if it does not exist.
///
/// New directories are owner-only on Unix.
pub async fn ensure_output_root(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::ConfigValidation {
            field: "output".to_string(),
            message: format!("'{}' exists and is not a directory", path.display()),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder.create(path).await?;
            tracing::debug!("Created output directory {}", path.display());
            Ok(())
        }
        Err(e) => Err(Error::Io(e)),
    }
}
