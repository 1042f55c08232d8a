//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning to stderr.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Render the echo line printed before an external command runs.
///
/// `note` is shown in parentheses (e.g. the review instructions of an
/// interactive session) and `dry` marks commands that are skipped.
pub fn format_command(command: &str, note: Option<&str>, dry: bool) -> String {
    let mut line = format!("> {}", command);
    if let Some(note) = note {
        line.push_str(&format!(" ({})", note));
    }
    if dry {
        line.push_str(" (dry mode)");
    }
    line
}

/// Print the echo line for an external command.
pub fn display_command(command: &str, note: Option<&str>, dry: bool) {
    println!("{}", style(format_command(command, note, dry)).cyan());
}

/// Print the content a file would get, in place of writing it.
pub fn display_dry_update(path: &str, content: &str) {
    println!("{}", style(format!("> would update {} (dry mode):", path)).cyan());
    println!("{}", content);
}

/// Print a block of command output, e.g. the commit about to be pushed.
pub fn display_block(title: &str, body: &str) {
    println!("\n{}", style(title).bold());
    for line in body.lines() {
        println!("  {}", line);
    }
}
