//! Command-line argument definitions using clap.

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use url::Url;

use crate::config::{AccountConfig, BackupTarget, Config, ProgressMode};
use crate::download::DEFAULT_CONCURRENCY;
use crate::share::retry::DEFAULT_MAX_RETRIES;

/// Azure File Share backup CLI.
#[derive(Parser, Debug)]
#[command(
    name = "azurefileshare",
    version,
    about = "Back up files and directories from an Azure File Share",
    long_about = "Download a single file or a whole directory tree from an Azure File Share.\n\n\
                  Account credentials are read from ACCOUNT_NAME and ACCOUNT_KEY, which may be \
                  set in a dotenv file."
)]
pub struct Cli {
    /// Path to a dotenv file loaded before the command runs [default: .env].
    #[arg(long = "env-file", global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a file or directory from a share to local disk.
    Backup(BackupArgs),
}

/// Arguments of the `backup` command.
#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["file", "directory"])
))]
pub struct BackupArgs {
    /// Name of the Azure File Share.
    #[arg(short, long)]
    pub share: String,

    /// File to download.
    #[arg(short, long)]
    pub file: Option<String>,

    /// Directory to download, including all subdirectories.
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Output directory. Files are written flat into it.
    #[arg(short, long, default_value = "output/")]
    pub output: PathBuf,

    /// GPG key ID. Accepted for compatibility; files are not encrypted.
    #[arg(short = 'k', long = "key-id")]
    pub key_id: Option<String>,

    /// Maximum number of files downloaded at the same time.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Retries per file for transient transfer errors.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Stop every transfer on the first failed file.
    #[arg(long)]
    pub fail_fast: bool,

    /// How transfer progress is shown.
    #[arg(long, value_enum, default_value_t = ProgressModeArg::Lines)]
    pub progress: ProgressModeArg,

    /// Service endpoint override (also read from AZURE_FILE_ENDPOINT).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<Url>,
}

/// CLI progress mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressModeArg {
    /// Print a line after every received chunk.
    Lines,
    /// Show one progress bar per file.
    Bars,
    /// Print no progress.
    Quiet,
}

impl From<ProgressModeArg> for ProgressMode {
    fn from(arg: ProgressModeArg) -> Self {
        match arg {
            ProgressModeArg::Lines => ProgressMode::Lines,
            ProgressModeArg::Bars => ProgressMode::Bars,
            ProgressModeArg::Quiet => ProgressMode::Quiet,
        }
    }
}

impl BackupArgs {
    /// Combine the arguments with account settings into a run configuration.
    ///
    /// `env_endpoint` is used when `--endpoint` was not given.
    pub fn into_config(self, account: AccountConfig, env_endpoint: Option<Url>) -> Config {
        // The arg group guarantees exactly one of the two
        let target = match (self.file, self.directory) {
            (Some(file), _) => BackupTarget::File(file),
            (None, Some(dir)) => BackupTarget::Directory(dir),
            (None, None) => BackupTarget::Directory(String::new()),
        };

        Config {
            account,
            share: self.share,
            target,
            output: self.output,
            concurrency: self.concurrency,
            max_retries: self.max_retries,
            fail_fast: self.fail_fast,
            progress: self.progress.into(),
            endpoint: self.endpoint.or(env_endpoint),
            key_id: self.key_id.filter(|k| !k.is_empty()),
        }
    }
}
