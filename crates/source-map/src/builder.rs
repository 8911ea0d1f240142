//! Source map builder for collecting line/column mappings during transformation.

use crate::LineCol;
use indexmap::IndexMap;

/// A single mapping from a generated position to an original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The position in the generated output.
    pub generated: LineCol,
    /// The position in the original source.
    pub original: LineCol,
    /// Index of the original source in [`SourceMap::sources`].
    pub source: u32,
}

/// The result of resolving a generated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
    /// Path of the original source, as listed in the map.
    pub source: &'a str,
    /// Position within the original source.
    pub position: LineCol,
}

/// A source map that tracks position mappings from generated code back to original source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    /// Identity of the generated document.
    file: String,
    /// Source paths in index order, with their embedded content.
    sources: IndexMap<String, Option<String>>,
    /// List of mappings, sorted by generated position.
    mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Creates a source map builder for the generated document `file`.
    pub fn builder(file: impl Into<String>) -> SourceMapBuilder {
        SourceMapBuilder::new(file)
    }

    pub(crate) fn from_parts(
        file: String,
        sources: IndexMap<String, Option<String>>,
        mut mappings: Vec<Mapping>,
    ) -> Self {
        mappings.sort_by_key(|m| m.generated);
        Self {
            file,
            sources,
            mappings,
        }
    }

    /// Returns the identity of the generated document.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Replaces the identity of the generated document.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Returns the number of mappings in this source map.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if this source map has no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns all mappings, ordered by generated position.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Returns an iterator over the source paths in index order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Returns the path of the source at `index`.
    pub fn source(&self, index: u32) -> Option<&str> {
        self.sources
            .get_index(index as usize)
            .map(|(path, _)| path.as_str())
    }

    /// Returns the embedded content of the source at `path`, if any.
    pub fn source_content(&self, path: &str) -> Option<&str> {
        self.sources.get(path)?.as_deref()
    }

    pub(crate) fn source_entries(&self) -> &IndexMap<String, Option<String>> {
        &self.sources
    }

    /// Resolves a generated position to the original position it came from.
    ///
    /// Picks the mapping on the same generated line with the greatest column
    /// not after `generated.col`. Returns `None` if the line has no such mapping.
    pub fn original_position(&self, generated: LineCol) -> Option<OriginalPosition<'_>> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };

        let mapping = self
            .mappings
            .get(idx)
            .filter(|m| m.generated.line == generated.line)?;

        Some(OriginalPosition {
            source: self.source(mapping.source)?,
            position: mapping.original,
        })
    }

    /// Finds the generated position for a position in the original `source`.
    ///
    /// Considers mappings on the same original line and picks the one with
    /// the greatest original column not after `original.col`.
    pub fn generated_position(&self, source: &str, original: LineCol) -> Option<LineCol> {
        let source = self.sources.get_index_of(source)? as u32;

        // Linear search since mappings are sorted by generated position
        self.mappings
            .iter()
            .filter(|m| {
                m.source == source
                    && m.original.line == original.line
                    && m.original.col <= original.col
            })
            .max_by_key(|m| m.original.col)
            .map(|m| m.generated)
    }
}

/// A builder for constructing source maps during transformation.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    file: String,
    sources: IndexMap<String, Option<String>>,
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    /// Creates a new source map builder for the generated document `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Registers a source path and returns its index.
    ///
    /// Registering the same path twice returns the same index.
    pub fn add_source(&mut self, path: &str) -> u32 {
        match self.sources.get_index_of(path) {
            Some(index) => index as u32,
            None => {
                let (index, _) = self.sources.insert_full(path.to_string(), None);
                index as u32
            }
        }
    }

    /// Embeds the verbatim content of a source, registering it if needed.
    pub fn set_source_content(&mut self, path: &str, content: impl Into<String>) {
        let index = self.add_source(path) as usize;
        if let Some((_, slot)) = self.sources.get_index_mut(index) {
            *slot = Some(content.into());
        }
    }

    /// Adds a mapping from a generated position to a position in `source`.
    pub fn add_mapping(&mut self, generated: LineCol, original: LineCol, source: &str) {
        let source = self.add_source(source);
        self.mappings.push(Mapping {
            generated,
            original,
            source,
        });
    }

    /// Builds the final source map.
    pub fn build(self) -> SourceMap {
        // Stable sort keeps insertion order for mappings at the same position
        SourceMap::from_parts(self.file, self.sources, self.mappings)
    }
}
