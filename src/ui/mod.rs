//! User interface module - the output sink and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [Output] sink operations write their lines to

pub mod formatter;

pub use formatter::{display_error, format_error};

/// Line-oriented sink for user-facing output
pub trait Output {
    fn println(&mut self, line: &str);
}

/// Writes lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn println(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferOutput {
    lines: Vec<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Output for BufferOutput {
    fn println(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
