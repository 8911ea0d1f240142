//! Source documents split into lines.

use crate::TransformError;
use source_map::LineIndex;

/// A source text together with its line split.
///
/// The split is computed once and shared by everything that needs the line
/// structure, so generated code and its source map always agree on it.
#[derive(Debug, Clone)]
pub struct SourceDocument<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> SourceDocument<'a> {
    /// Splits `text` on `\n`.
    ///
    /// There is always at least one line; an empty text is one empty line.
    /// Texts too large for 32-bit offsets fail with
    /// [`TransformError::InvalidInput`].
    pub fn new(text: &'a str) -> Result<Self, TransformError> {
        let index =
            LineIndex::new(text).map_err(|e| TransformError::InvalidInput(e.to_string()))?;
        let lines = index.lines(text).collect();
        Ok(Self { text, lines })
    }

    /// Decodes `bytes` as UTF-8 and splits the result.
    pub fn from_utf8(bytes: &'a [u8]) -> Result<Self, TransformError> {
        Self::new(std::str::from_utf8(bytes)?)
    }

    /// Returns the full original text.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the lines, without their `\n`.
    #[inline]
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Returns the number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
