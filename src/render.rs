//! Terminal output for streamed and buffered results.
//!
//! Streamed content is written through a single locked stdout handle and
//! flushed per chunk so tokens appear as they arrive, with optional ANSI
//! styling for informational and error lines.

use std::io::{self, Stdout, Write};

/// ANSI escape code for dim text (used for informational lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    line_start: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            line_start: true,
        }
    }

    /// Print a chunk of streamed text, flushing immediately.
    pub fn print_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut lock = self.stdout.lock();
        let _ = lock.write_all(text.as_bytes());
        let _ = lock.flush();
        self.line_start = text.ends_with('\n');
    }

    /// Print an informational line, dimmed when colors are enabled.
    pub fn print_info(&mut self, info: &str) {
        let line = if self.use_color {
            format!("{ANSI_DIM}{info}{ANSI_RESET}\n")
        } else {
            format!("{info}\n")
        };
        let mut lock = self.stdout.lock();
        let _ = lock.write_all(line.as_bytes());
        let _ = lock.flush();
        self.line_start = true;
    }

    /// Print an error line to stderr, red when colors are enabled.
    pub fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}{error}{ANSI_RESET}");
        } else {
            eprintln!("{error}");
        }
    }

    /// Ensure output ends at the start of a line after streaming.
    pub fn finish_response(&mut self) {
        if !self.line_start {
            self.print_text("\n");
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
