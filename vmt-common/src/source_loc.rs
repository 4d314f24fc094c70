//! Source location tracking for error reporting
//!
//! VM commands are line oriented, so a location is just a file name and a
//! 1-based line number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line in a VM source file (line is 1-based, 0 means unknown)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(filename: &str, line: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
        }
    }

    /// Location used before the dispatcher knows where a command came from
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.filename == "<unknown>"
    }

    /// Same file, different line
    pub fn with_line(&self, line: u32) -> Self {
        Self {
            filename: self.filename.clone(),
            line,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.filename)
        } else {
            write!(f, "{}:{}", self.filename, self.line)
        }
    }
}
