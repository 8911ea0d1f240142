//! Source maps for generated printing modules.

use crate::{SourceDocument, Template};
use source_map::{LineCol, SourceMap};

/// 0-indexed original column every mapping points at; lines are mapped as a
/// whole. Reported as column 1 in [`PositionRecord`].
pub const ORIGINAL_COLUMN: u32 = 0;

/// One generated-line ↔ original-line correspondence.
///
/// Lines and columns are 1-indexed, as editors and stack traces show them.
/// The encoded `mappings` of the [`SourceMap`] stay 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRecord {
    /// 1-indexed line in the generated module.
    pub generated_line: u32,
    /// 1-indexed column of the statement in the generated module.
    pub generated_column: u32,
    /// 1-indexed line in the original source.
    pub original_line: u32,
    /// 1-indexed column in the original source; always 1.
    pub original_column: u32,
    /// Source path the record refers to.
    pub source_path: String,
}

/// Builds the source map for `doc` rendered with `template`.
///
/// Emits one mapping per source line, in line order, from the line's
/// statement to the start of the line, and embeds the whole text under
/// `relative_path`.
pub fn build_position_map(
    doc: &SourceDocument<'_>,
    template: &Template,
    file: &str,
    relative_path: &str,
) -> SourceMap {
    let mut builder = SourceMap::builder(file);
    builder.set_source_content(relative_path, doc.text());

    for line in 0..doc.line_count() as u32 {
        builder.add_mapping(
            template.statement_position(line),
            LineCol::new(line, ORIGINAL_COLUMN),
            relative_path,
        );
    }

    builder.build()
}

/// Lists the mappings of `map` as [`PositionRecord`]s.
pub fn position_records(map: &SourceMap) -> Vec<PositionRecord> {
    map.mappings()
        .iter()
        .map(|m| PositionRecord {
            generated_line: m.generated.line + 1,
            generated_column: m.generated.col + 1,
            original_line: m.original.line + 1,
            original_column: m.original.col + 1,
            source_path: map.source(m.source).unwrap_or_default().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HEADER_LINES, PRINT_TEMPLATE, STATEMENT_COLUMN};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_record_per_line() {
        let doc = SourceDocument::new("a\n\"b\"\n\\c\n").unwrap();
        let map = build_position_map(&doc, &PRINT_TEMPLATE, "out.js", "src/a.txt");
        let records = position_records(&map);

        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.original_line, i as u32 + 1);
            assert_eq!(record.generated_line, record.original_line + HEADER_LINES);
            assert_eq!(record.generated_column, STATEMENT_COLUMN + 1);
            assert_eq!(record.original_column, 1);
            assert_eq!(record.source_path, "src/a.txt");
        }
    }

    #[test]
    fn test_mappings_stay_zero_indexed() {
        let doc = SourceDocument::new("x\ny").unwrap();
        let map = build_position_map(&doc, &PRINT_TEMPLATE, "out.js", "x.txt");
        for mapping in map.mappings() {
            assert_eq!(mapping.generated.col, STATEMENT_COLUMN);
            assert_eq!(mapping.original.col, ORIGINAL_COLUMN);
        }
        assert_eq!(map.mappings()[0].original.line, 0);
    }

    #[test]
    fn test_embeds_whole_text() {
        let text = "x\r\ny\n\n";
        let doc = SourceDocument::new(text).unwrap();
        let map = build_position_map(&doc, &PRINT_TEMPLATE, "o", "x.txt");
        assert_eq!(map.sources().collect::<Vec<_>>(), vec!["x.txt"]);
        assert_eq!(map.source_content("x.txt"), Some(text));
        assert_eq!(map.file(), "o");
    }
}
