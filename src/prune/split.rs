// src/prune/split.rs

use tracing::trace;

use super::table::Row;

/// Result of splitting one data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    /// The naive split already had the expected arity.
    Clean(Row),
    /// Arity was restored by neutralizing delimiters inside quotes.
    Repaired(Row),
    /// Arity could not be restored. `line` is the rewritten text.
    Mismatch { cells: Row, line: String },
}

impl Split {
    pub fn cells(&self) -> &Row {
        match self {
            Split::Clean(cells) | Split::Repaired(cells) => cells,
            Split::Mismatch { cells, .. } => cells,
        }
    }
}

/// Turns raw lines into rows, repairing delimiters that sit in quoted spans.
///
/// Quote tracking is a plain toggle on every `"`: an escaped `""` flips the
/// state twice and is never unescaped.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    delimiter: char,
    quoted_delimiter: char,
}

impl Splitter {
    pub fn new(delimiter: char, quoted_delimiter: char) -> Self {
        Self {
            delimiter,
            quoted_delimiter,
        }
    }

    /// Split on the delimiter, no quote handling. Used for the header line.
    pub fn split_naive(&self, line: &str) -> Row {
        line.split(self.delimiter).map(str::to_string).collect()
    }

    /// Split a data line expected to hold `expected` cells.
    pub fn split(&self, line: &str, expected: usize) -> Split {
        let cells = self.split_naive(line);
        if cells.len() == expected {
            return Split::Clean(cells);
        }

        let rewritten = self.neutralize_quoted(line);
        let cells = self.split_naive(&rewritten);
        trace!(
            found = cells.len(),
            expected,
            "re-split after quoted delimiter substitution"
        );
        if cells.len() == expected {
            Split::Repaired(cells)
        } else {
            Split::Mismatch {
                cells,
                line: rewritten,
            }
        }
    }

    /// Replace every delimiter found inside a quoted span.
    /// `...#"...#..."#...` becomes `...#"...$..."#...`.
    pub fn neutralize_quoted(&self, line: &str) -> String {
        let mut inside = false;
        line.chars()
            .map(|ch| {
                if ch == '"' {
                    inside = !inside;
                }
                if inside && ch == self.delimiter {
                    self.quoted_delimiter
                } else {
                    ch
                }
            })
            .collect()
    }
}
