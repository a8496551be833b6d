//! Source location tracking for error reporting and syntax extraction.
//!
//! Provides [`Span`] to track where tokens, declarations and errors occur in
//! source code. Unlike a pure diagnostic span, it also records the byte offset
//! so the exact source text of a node can be sliced back out.

use std::fmt;
use std::ops::Range;

/// A span of source code.
///
/// Tracks the line:column where the span starts (for diagnostics) and the
/// byte offset plus length (for slicing the original text).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character.
    pub offset: u32,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(offset: u32, line: u32, col: u32, len: u32) -> Self {
        Self {
            offset,
            line,
            col,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(offset: u32, line: u32, col: u32) -> Self {
        Self {
            offset,
            line,
            col,
            len: 0,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Byte offset one past the last character.
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// The byte range covered by this span.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset as usize..self.end() as usize
    }

    /// Merge two spans into one covering both.
    ///
    /// The line and column are taken from whichever span starts first.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.offset <= other.offset {
            (self, other)
        } else {
            (other, self)
        };
        let end = self.end().max(other.end());
        Span {
            offset: first.offset,
            line: first.line,
            col: first.col,
            len: end - first.offset,
        }
    }

    /// Slice the text covered by this span out of `source`.
    ///
    /// Returns `None` if the span does not fit inside `source` or does not
    /// land on character boundaries.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.range())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
