//! Statistics reporting.

use console::style;

use crate::download::BackupSummary;
use crate::output::console::print_error;

/// Print statistics for a finished backup run.
pub fn print_backup_stats(summary: &BackupSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Backup Statistics:").bold());
    println!("  Files downloaded: {}", style(summary.files_downloaded()).green());
    println!("  Bytes written:    {}", format_bytes(summary.bytes_downloaded()));
    if summary.files_failed() > 0 {
        println!("  Files failed:     {}", style(summary.files_failed()).red());
    }
    if summary.cancelled > 0 {
        println!("  Cancelled:        {}", style(summary.cancelled).yellow());
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print one line per failed file.
pub fn print_failures(summary: &BackupSummary) {
    for failure in &summary.failures {
        match &failure.location {
            Some(location) => print_error(&format!("{}: {}", location, failure.error)),
            None => print_error(&failure.error.to_string()),
        }
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
