//! Pure formatting functions for UI output.
//!
//! Colouring goes through `console`, which drops the escape codes when the
//! stream is not a terminal.

use console::style;

/// Error line shown on stderr
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_contains_message() {
        let line = console::strip_ansi_codes(&format_error("no remotes found")).to_string();
        assert_eq!(line, "ERROR: no remotes found");
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
