//! Cargo-style status output for the pixelpress CLI.
//!
//! Status lines go to stderr with a right-aligned coloured verb; stdout is
//! left free for `--json` reports and completion scripts.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const VERB_WIDTH: usize = 12;

/// Colour of the verb column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Green,
    Cyan,
    Yellow,
    Red,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Green => "\x1b[1;32m",
            Tone::Cyan => "\x1b[1;36m",
            Tone::Yellow => "\x1b[1;33m",
            Tone::Red => "\x1b[1;31m",
        }
    }
}

/// Terminal-aware status printer.
///
/// Colour is enabled only when stderr is a terminal.
#[derive(Debug)]
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Progress line, e.g. `  Compressed walk/01.png`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Green, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.emit(Tone::Green, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Cyan, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Yellow, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.emit(Tone::Red, verb, message);
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let line = format_line(self.color.then_some(tone), verb, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

fn format_line(tone: Option<Tone>, verb: &str, message: &str) -> String {
    match tone {
        Some(tone) => format!("{}{verb:>VERB_WIDTH$}\x1b[0m {message}", tone.ansi()),
        None => format!("{verb:>VERB_WIDTH$} {message}"),
    }
}

/// `plural(1, "image", "images")` gives "1 image".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// Path relative to the working directory when it lies inside it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(r) if r.as_os_str().is_empty() => ".".to_string(),
        Some(r) => r.display().to_string(),
        None => path.display().to_string(),
    }
}
