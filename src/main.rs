//! azurefileshare - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use azurefileshare::{
    api::AzureFileClient,
    cli::{Cli, Command},
    config::{
        load_env_file,
        loader::{endpoint_from_env, DEFAULT_ENV_FILE},
        validate_config, AccountConfig, EnvFileStatus,
    },
    download::{run_backup, BackupSummary},
    error::{exit_codes, Error, Result},
    output::{
        format_bytes, print_backup_stats, print_config_summary, print_error, print_failures,
        print_info, print_success, print_warning, Progress,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(summary) if summary.is_success() => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(_) => ExitCode::from(exit_codes::SOME_FILES_FAILED as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::Credential(_)
                | Error::UrlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api { .. } | Error::Listing { .. } | Error::Http(_) | Error::Xml(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_)
                | Error::RetriesExhausted { .. }
                | Error::InvalidFilename(_)
                | Error::Io(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<BackupSummary> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load the env file before reading any account settings
    let explicit = cli.env_file.is_some();
    let env_file = cli
        .env_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));

    match load_env_file(&env_file, explicit)? {
        EnvFileStatus::Loaded(path) => print_info(&format!("Using env file {}", path.display())),
        EnvFileStatus::Missing(path) => print_warning(&format!(
            "Env file not found: {}, using the process environment",
            path.display()
        )),
    }

    let Command::Backup(args) = cli.command;

    let account = AccountConfig::from_env()?;
    let config = args.into_config(account, endpoint_from_env()?);
    validate_config(&config)?;

    if let Some(key_id) = &config.key_id {
        print_warning(&format!(
            "--key-id {} is accepted but encryption is not implemented; files are written as is",
            key_id
        ));
    }

    let client = AzureFileClient::new(config.account.credential()?, config.endpoint.clone())?;
    tracing::debug!("Using endpoint {}", client.endpoint());

    let request = config.backup_request();
    print_config_summary(
        &request.location.to_string(),
        if request.is_directory { "directory" } else { "file" },
        &request.output_root.display().to_string(),
        request.concurrency,
    );

    let progress = Progress::new(config.progress);
    tracing::debug!("Progress mode: {}", progress.mode());

    let summary = run_backup(Arc::new(client), &request, progress).await?;

    print_backup_stats(&summary);
    print_failures(&summary);

    if summary.is_success() {
        print_success(&format!(
            "Downloaded {} file(s), {}",
            summary.files_downloaded(),
            format_bytes(summary.bytes_downloaded())
        ));
    }

    Ok(summary)
}
