use std::fmt;

use serde::Serialize;

/// A `Position` represents a human readable position in the source.
///
/// Both fields are 1-based and counted in Unicode codepoints.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize)]
pub struct Position {
    /// The line number of the position.
    pub line: usize,
    /// The column number of the position.
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Position {
    /// Advance past `c`, moving to the start of the next line on `\n`.
    #[must_use]
    pub(crate) fn after(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
