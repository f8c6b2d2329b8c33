//! Command-line interface.

pub mod args;

pub use args::{BackupArgs, Cli, Command, ProgressModeArg};
