//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print configuration summary.
pub fn print_config_summary(source: &str, kind: &str, output_dir: &str, concurrency: usize) {
    println!();
    println!("{}", style("Backup:").bold());
    println!("  Source:      {} ({})", source, kind);
    println!("  Output:      {}", output_dir);
    println!("  Concurrency: {}", concurrency);
    println!();
}
