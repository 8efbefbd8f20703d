//! Line index for byte offset → coordinate conversion.

use serde::Serialize;
use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A position in a text document as source maps report it.
///
/// Lines are 1-indexed, columns are 0-indexed and measured in UTF-16 code
/// units. For ASCII text the column equals the byte distance from the start
/// of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    /// 1-indexed line number.
    pub line: u32,
    /// 0-indexed column.
    pub column: u32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An index over the line starts of a text, borrowed for the index's lifetime.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// `line_starts[i]` is the offset where 0-indexed line `i` begins.
    line_starts: Vec<ByteOffset>,
}

impl<'a> LineIndex<'a> {
    /// Creates a new line index from source text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self { text, line_starts }
    }

    /// Returns the number of `\n`-delimited segments in the text.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a coordinate.
    ///
    /// The line is the number of segments preceding `offset` and the column is
    /// the length of the final partial segment. Returns `None` if the offset is
    /// past the end of the text or does not fall on a character boundary.
    pub fn coordinate(&self, offset: ByteOffset) -> Option<Coordinate> {
        let end = usize::from(offset);
        if end > self.text.len() || !self.text.is_char_boundary(end) {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };

        let start = usize::from(self.line_starts[line]);
        let column = self.text[start..end].encode_utf16().count() as u32;

        Some(Coordinate {
            line: line as u32 + 1,
            column,
        })
    }

    /// Returns the text of a 1-indexed line, without its newline.
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = usize::from(*self.line_starts.get(idx)?);
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| usize::from(next) - 1)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }
}
