//! Configuration module for azurefileshare.
//!
//! This module handles:
//! - Loading the dotenv file and account settings from the environment
//! - The resolved backup configuration
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{load_env_file, AccountConfig, BackupTarget, Config, EnvFileStatus};
pub use modes::ProgressMode;
pub use validation::validate_config;
