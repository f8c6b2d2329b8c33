//! Per-file transfer progress.

use std::path::Path;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::config::ProgressMode;

/// Shared progress display for all downloads of a run.
#[derive(Clone)]
pub struct Progress {
    mode: ProgressMode,
    bars: Option<MultiProgress>,
}

impl Progress {
    pub fn new(mode: ProgressMode) -> Self {
        let bars = match mode {
            ProgressMode::Bars => Some(MultiProgress::new()),
            _ => None,
        };
        Self { mode, bars }
    }

    pub fn quiet() -> Self {
        Self::new(ProgressMode::Quiet)
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Start reporting for one destination file.
    pub fn file(&self, path: &Path) -> FileProgress {
        let bar = self.bars.as_ref().map(|multi| {
            let bar = multi.add(create_download_bar(0));
            bar.set_message(file_label(path));
            bar
        });

        FileProgress {
            mode: self.mode,
            path: path.display().to_string(),
            bar,
        }
    }
}

/// Progress reporter for a single file.
pub struct FileProgress {
    mode: ProgressMode,
    path: String,
    bar: Option<ProgressBar>,
}

impl FileProgress {
    /// Report `transferred` of `total` bytes.
    pub fn update(&self, transferred: u64, total: u64) {
        match self.mode {
            ProgressMode::Lines => {
                println!(
                    "File {}: downloaded {} of {} bytes.",
                    self.path, transferred, total
                );
            }
            ProgressMode::Bars => {
                if let Some(ref bar) = self.bar {
                    if bar.length() != Some(total) {
                        bar.set_length(total);
                    }
                    bar.set_position(transferred);
                }
            }
            ProgressMode::Quiet => {}
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn abandon(self) {
        if let Some(bar) = self.bar {
            bar.abandon();
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Create a progress bar for downloads.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}
