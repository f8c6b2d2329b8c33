//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::{BackupTarget, Config};
use crate::error::{Error, Result};
use crate::share::RemoteLocation;

/// Maximum share name length.
const MAX_SHARE_NAME_LENGTH: usize = 63;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_account_name(&config.account.account_name)?;
    validate_share_name(&config.share)?;
    validate_target(&config.share, &config.target)?;
    validate_concurrency(config.concurrency)?;

    Ok(())
}

/// Validate the storage account name.
pub fn validate_account_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MissingConfig("ACCOUNT_NAME".to_string()));
    }

    // 3-24 chars, lowercase letters and digits only
    let pattern = Regex::new(r"^[a-z0-9]{3,24}$").unwrap();
    if !pattern.is_match(name) {
        return Err(Error::ConfigValidation {
            field: "ACCOUNT_NAME".to_string(),
            message: format!(
                "'{}' is not a valid storage account name (3-24 lowercase letters and digits)",
                name
            ),
        });
    }

    Ok(())
}

/// Validate a file share name.
pub fn validate_share_name(share: &str) -> Result<()> {
    if share.is_empty() {
        return Err(Error::MissingConfig("share".to_string()));
    }

    let pattern = Regex::new(r"^[a-z0-9-]{3,}$").unwrap();
    let invalid = |message: String| Error::ConfigValidation {
        field: "share".to_string(),
        message,
    };

    if share.len() > MAX_SHARE_NAME_LENGTH {
        return Err(invalid(format!(
            "Share name '{}' is too long (maximum {} characters)",
            share, MAX_SHARE_NAME_LENGTH
        )));
    }

    if !pattern.is_match(share) {
        return Err(invalid(format!(
            "Share name '{}' must be at least 3 lowercase letters, digits or hyphens",
            share
        )));
    }

    if share.starts_with('-') || share.ends_with('-') || share.contains("--") {
        return Err(invalid(format!(
            "Share name '{}' cannot start or end with a hyphen or contain consecutive hyphens",
            share
        )));
    }

    Ok(())
}

/// Validate the remote file or directory path.
pub fn validate_target(share: &str, target: &BackupTarget) -> Result<()> {
    let location = RemoteLocation::new(share, target.path());

    if location.segments().iter().any(|s| s == "..") {
        return Err(Error::ConfigValidation {
            field: "path".to_string(),
            message: format!("'{}' must not contain '..' segments", target.path()),
        });
    }

    if let BackupTarget::File(path) = target {
        if location.is_root() {
            return Err(Error::ConfigValidation {
                field: "file".to_string(),
                message: format!("'{}' does not name a file", path),
            });
        }
    }

    Ok(())
}

/// Validate the number of concurrent transfers.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: "Concurrency must be at least 1".to_string(),
        });
    }

    Ok(())
}
