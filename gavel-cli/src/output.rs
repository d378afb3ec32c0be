// gavel-cli/src/output.rs
//
// Terminal output helpers for validation results.

use std::path::Path;

use console::style;
use gavel_core::FileCheck;

/// Print a heading with clear separation.
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    println!("\n{}", style(&line).blue());
    println!("{}", style(text).bold());
    println!("{}", style(&line).blue());
}

/// Print one file's verdict as a single PASS/FAIL line.
pub fn print_check(path: &Path, check: &FileCheck) {
    let verdict = if check.is_valid {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!("{} {} - {}", verdict, path.display(), check.message);
}

/// Print the run summary.
pub fn print_summary(passed: usize, failed: usize) {
    if failed == 0 {
        println!(
            "\n{}",
            style(format!("All {} file(s) passed validation", passed)).green()
        );
    } else {
        println!(
            "\n{}",
            style(format!("{} passed, {} failed", passed, failed)).red()
        );
    }
}
