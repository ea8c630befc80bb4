//! Position and location utilities.
//!
//! Diagnostics render line/column positions, while the AST uses byte
//! offsets. This module provides conversion utilities.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column in bytes
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Source location with both offset and line/column info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Byte offset from start of file
    pub offset: u32,
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column in bytes
    pub column: u32,
}

/// Line map for efficient offset -> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];

        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            } else if ch == '\r' {
                // \r followed by \n: the \n creates the line start
                let next_idx = i + 1;
                if source.as_bytes().get(next_idx) != Some(&b'\n') {
                    line_starts.push(u32::try_from(next_idx).unwrap_or(u32::MAX));
                }
            }
        }

        Self { line_starts }
    }

    /// Number of lines in the file.
    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the last line start clamp to the last line.
    #[must_use]
    pub fn position_of(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line.saturating_sub(1),
        };
        let column = offset - self.line_starts[line];
        Position::new(line as u32, column)
    }

    /// Starting byte offset of a 0-indexed line, if it exists.
    #[must_use]
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_one_line() {
        let map = LineMap::build("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.position_of(0), Position::new(0, 0));
    }

    #[test]
    fn position_of_walks_lines() {
        let map = LineMap::build("ab\ncd\n\nxyz");
        assert_eq!(map.position_of(0), Position::new(0, 0));
        assert_eq!(map.position_of(1), Position::new(0, 1));
        assert_eq!(map.position_of(3), Position::new(1, 0));
        assert_eq!(map.position_of(6), Position::new(2, 0));
        assert_eq!(map.position_of(7), Position::new(3, 0));
        assert_eq!(map.position_of(9), Position::new(3, 2));
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let map = LineMap::build("a\r\nb\rc");
        assert_eq!(map.position_of(3), Position::new(1, 0));
        assert_eq!(map.position_of(5), Position::new(2, 0));
    }
}
