//! Configuration structures and loading logic.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use url::Url;

use crate::api::SharedKeyCredential;
use crate::config::modes::ProgressMode;
use crate::download::BackupRequest;
use crate::error::{Error, Result};
use crate::share::{RemoteLocation, RetryPolicy};

/// Environment variable holding the storage account name.
pub const ACCOUNT_NAME_VAR: &str = "ACCOUNT_NAME";

/// Environment variable holding the base64 shared key.
pub const ACCOUNT_KEY_VAR: &str = "ACCOUNT_KEY";

/// Environment variable overriding the service endpoint.
pub const ENDPOINT_VAR: &str = "AZURE_FILE_ENDPOINT";

/// Env file read when `--env-file` is not given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Outcome of loading a dotenv file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    /// The default env file does not exist; the process environment is used as is.
    Missing(PathBuf),
}

/// Load a dotenv file into the process environment.
///
/// Variables already set in the environment win over the file. A missing file
/// is only an error when the path was chosen explicitly.
pub fn load_env_file(path: &Path, explicit: bool) -> Result<EnvFileStatus> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(EnvFileStatus::Loaded(path.to_path_buf())),
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound && !explicit => {
            Ok(EnvFileStatus::Missing(path.to_path_buf()))
        }
        Err(e) => Err(Error::Config(format!(
            "Error loading env file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Storage account identity.
#[derive(Clone)]
pub struct AccountConfig {
    pub account_name: String,
    pub account_key: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

impl AccountConfig {
    /// Read the account from `ACCOUNT_NAME` and `ACCOUNT_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the account through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::MissingConfig(name.to_string()))
        };

        Ok(Self {
            account_name: read(ACCOUNT_NAME_VAR)?,
            account_key: read(ACCOUNT_KEY_VAR)?,
        })
    }

    /// Build the shared key credential for this account.
    pub fn credential(&self) -> Result<SharedKeyCredential> {
        SharedKeyCredential::new(&self.account_name, &self.account_key)
    }
}

/// Remote path to back up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupTarget {
    File(String),
    Directory(String),
}

impl BackupTarget {
    pub fn path(&self) -> &str {
        match self {
            BackupTarget::File(p) | BackupTarget::Directory(p) => p,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, BackupTarget::Directory(_))
    }
}

/// Fully resolved configuration for one backup run.
#[derive(Debug, Clone)]
pub struct Config {
    pub account: AccountConfig,
    pub share: String,
    pub target: BackupTarget,
    pub output: PathBuf,
    pub concurrency: usize,
    pub max_retries: u32,
    pub fail_fast: bool,
    pub progress: ProgressMode,
    pub endpoint: Option<Url>,
    /// Accepted for compatibility; no encryption is performed.
    pub key_id: Option<String>,
}

impl Config {
    /// Remote location of the backup target.
    pub fn location(&self) -> RemoteLocation {
        RemoteLocation::new(&self.share, self.target.path())
    }

    pub fn backup_request(&self) -> BackupRequest {
        let mut request =
            BackupRequest::new(self.location(), self.target.is_directory(), &self.output);
        request.concurrency = self.concurrency;
        request.retry = RetryPolicy::new(self.max_retries);
        request.fail_fast = self.fail_fast;
        request
    }
}

/// Endpoint override from the environment, if set.
pub fn endpoint_from_env() -> Result<Option<Url>> {
    match std::env::var(ENDPOINT_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(Some(Url::parse(value.trim())?)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_account_from_lookup() {
        let account = AccountConfig::from_lookup(lookup(&[
            ("ACCOUNT_NAME", "myaccount"),
            ("ACCOUNT_KEY", " a2V5 "),
        ]))
        .unwrap();
        assert_eq!(account.account_name, "myaccount");
        assert_eq!(account.account_key, "a2V5");
        assert!(account.credential().is_ok());
    }

    #[test]
    fn test_account_missing_values() {
        let err = AccountConfig::from_lookup(lookup(&[("ACCOUNT_KEY", "a2V5")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ref v) if v == "ACCOUNT_NAME"));

        let err = AccountConfig::from_lookup(lookup(&[
            ("ACCOUNT_NAME", "myaccount"),
            ("ACCOUNT_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ref v) if v == "ACCOUNT_KEY"));
    }

    #[test]
    fn test_account_debug_redacts_key() {
        let account = AccountConfig {
            account_name: "myaccount".into(),
            account_key: "c2VjcmV0".into(),
        };
        assert!(!format!("{:?}", account).contains("c2VjcmV0"));
    }

    #[test]
    fn test_load_env_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.env");
        std::fs::write(&path, "AZUREFILESHARE_TEST_ONLY_VAR=from-file\n").unwrap();

        let status = load_env_file(&path, true).unwrap();
        assert_eq!(status, EnvFileStatus::Loaded(path.clone()));
        assert_eq!(
            std::env::var("AZUREFILESHARE_TEST_ONLY_VAR").unwrap(),
            "from-file"
        );
    }

    #[test]
    fn test_missing_env_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.env");

        assert_eq!(
            load_env_file(&path, false).unwrap(),
            EnvFileStatus::Missing(path.clone())
        );
        assert!(matches!(load_env_file(&path, true), Err(Error::Config(_))));
    }

    #[test]
    fn test_backup_request_from_config() {
        let config = Config {
            account: AccountConfig {
                account_name: "myaccount".into(),
                account_key: "a2V5".into(),
            },
            share: "backups".into(),
            target: BackupTarget::Directory("/photos/2024/".into()),
            output: PathBuf::from("out"),
            concurrency: 4,
            max_retries: 5,
            fail_fast: true,
            progress: ProgressMode::Quiet,
            endpoint: None,
            key_id: None,
        };

        let request = config.backup_request();
        assert_eq!(request.location, RemoteLocation::new("backups", "photos/2024"));
        assert!(request.is_directory);
        assert_eq!(request.output_root, PathBuf::from("out"));
        assert_eq!(request.concurrency, 4);
        assert_eq!(request.retry.max_retries, 5);
        assert!(request.fail_fast);
    }
}
