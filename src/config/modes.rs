//! Progress output modes.

use std::fmt;

/// How per-file transfer progress is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// One line per received chunk (default).
    #[default]
    Lines,
    /// One progress bar per file.
    Bars,
    /// No progress output.
    Quiet,
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressMode::Lines => write!(f, "lines"),
            ProgressMode::Bars => write!(f, "bars"),
            ProgressMode::Quiet => write!(f, "quiet"),
        }
    }
}
