//! Source positions
//!
//! A [`Location`] is stamped onto every token and error. Lines and columns are 1-based, offsets
//! index bytes of the UTF-8 buffer, and columns count code points, so `ö` moves the column by
//! one and the offset by two. [`LineIndex`] answers the reverse question, offset to location,
//! for error reports that only kept an offset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from the beginning of the buffer
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in code points
    pub column: usize,
}

impl Location {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The location of the first character of any buffer.
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Returns the location reached after consuming `text` from this location.
    ///
    /// Every `\n` moves to the next line and resets the column to 1; every other
    /// code point advances the column by one.
    pub fn advance(self, text: &str) -> Self {
        let mut next = self;
        for ch in text.chars() {
            if ch == '\n' {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next.offset += text.len();
        next
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A region of source text (start inclusive, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// The byte range covered by this span.
    pub fn byte_range(&self) -> ByteRange<usize> {
        self.start.offset..self.end.offset
    }

}

/// Line starts of a buffer, for offset lookups in logarithmic time
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(newline, _)| newline + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a location. Offsets past the end clamp to the end of input.
    pub fn location(&self, byte_offset: usize) -> Location {
        let mut offset = byte_offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let column = self.source[self.line_starts[line]..offset].chars().count();

        Location::new(offset, line + 1, column + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where a 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }

    /// Text of a 1-based line, without its line terminator
    pub fn line_text(&self, line: usize) -> Option<&'src str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let text = &self.source[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }
}
