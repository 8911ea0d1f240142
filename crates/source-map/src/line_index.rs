//! Line index for splitting text into lines and converting offsets ↔ line/column.

use crate::SourceMapError;
use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within the line).
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// An index over the line structure of a text.
///
/// Lines are separated by `\n` only, so a text always has at least one line:
/// `""` is a single empty line and `"a\n"` is the two lines `"a"` and `""`.
/// A `\r` preceding a `\n` is kept as part of the line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<ByteOffset>,
    /// Total length of the indexed text.
    len: ByteOffset,
}

impl LineIndex {
    /// Creates a new line index from source text.
    ///
    /// Fails with [`SourceMapError::TextTooLarge`] if offsets into `text` do
    /// not fit in 32 bits.
    pub fn new(text: &str) -> Result<Self, SourceMapError> {
        let len = byte_offset(text.len())?;
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                // Next line starts after the newline
                line_starts.push(byte_offset(offset + 1)?);
            }
        }

        Ok(Self { line_starts, len })
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` if the offset is past the end of the text.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let line_start = self.line_starts[line];
        let col = u32::from(offset) - u32::from(line_start);

        Some(LineCol {
            line: line as u32,
            col,
        })
    }

    /// Converts a line/column position to a byte offset.
    ///
    /// Returns `None` if the line is out of bounds.
    pub fn offset(&self, line_col: LineCol) -> Option<ByteOffset> {
        let line_start = self.line_start(line_col.line)?;
        Some(line_start + TextSize::from(line_col.col))
    }

    /// Returns the byte offset where a line starts.
    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.line_starts.get(line as usize).copied()
    }

    /// Returns the byte offset where a line ends (before the newline).
    pub fn line_end(&self, line: u32) -> Option<ByteOffset> {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return None;
        }

        let end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - TextSize::from(1))
            .unwrap_or(self.len);

        Some(end)
    }

    /// Returns an iterator over the lines of `text`, without their `\n`.
    ///
    /// `text` must be the same text this index was built from.
    pub fn lines<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = &'t str> + 's
    where
        't: 's,
    {
        (0..self.line_count() as u32).map(move |line| {
            // Both bounds exist for every line below line_count.
            let start = self.line_starts[line as usize];
            let end = self.line_end(line).unwrap_or(self.len);
            &text[usize::from(start)..usize::from(end)]
        })
    }
}

fn byte_offset(offset: usize) -> Result<ByteOffset, SourceMapError> {
    TextSize::try_from(offset).map_err(|_| SourceMapError::TextTooLarge { len: offset })
}
