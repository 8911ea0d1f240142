//! Main transformation logic.

use crate::position_map::{build_position_map, position_records, PositionRecord};
use crate::{ResourceIdentity, SourceDocument, TransformError, PRINT_TEMPLATE};
use source_map::SourceMap;
use std::sync::OnceLock;

static TEMPLATE_CHECK: OnceLock<Result<(), TransformError>> = OnceLock::new();

/// Verifies [`PRINT_TEMPLATE`] once per process and returns the cached outcome.
pub fn self_check() -> Result<(), TransformError> {
    TEMPLATE_CHECK
        .get_or_init(|| PRINT_TEMPLATE.verify())
        .clone()
}

/// The result of transformation.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The generated module.
    pub code: String,
    /// The source map from `code` back to the original text.
    pub source_map: SourceMap,
    /// The resource path relative to the working directory, as used in the map.
    pub relative_path: String,
}

impl TransformResult {
    /// Lists the mappings as 1-indexed line records.
    pub fn records(&self) -> Vec<PositionRecord> {
        position_records(&self.source_map)
    }

    /// Serializes the source map to JSON.
    pub fn map_json(&self) -> Result<String, TransformError> {
        Ok(self.source_map.to_json()?)
    }
}

/// Wraps `source` into a module printing it line by line.
///
/// The generated module and its source map are derived from the same line
/// split. The map's `file` is the resource path; hosts writing the module
/// elsewhere can rename it with [`SourceMap::with_file`].
pub fn transform(
    source: &str,
    resource: &ResourceIdentity,
) -> Result<TransformResult, TransformError> {
    transform_document(&SourceDocument::new(source)?, resource)
}

/// Like [`transform`], for sources not yet known to be UTF-8.
pub fn transform_bytes(
    source: &[u8],
    resource: &ResourceIdentity,
) -> Result<TransformResult, TransformError> {
    transform_document(&SourceDocument::from_utf8(source)?, resource)
}

fn transform_document(
    doc: &SourceDocument<'_>,
    resource: &ResourceIdentity,
) -> Result<TransformResult, TransformError> {
    self_check()?;
    let relative_path = resource.relative_path()?;

    let code = PRINT_TEMPLATE.render(doc.lines());
    let source_map = build_position_map(
        doc,
        &PRINT_TEMPLATE,
        resource.resource_path().as_str(),
        &relative_path,
    );

    tracing::debug!(
        resource = %resource.resource_path(),
        lines = doc.line_count(),
        "wrapped source lines"
    );

    Ok(TransformResult {
        code,
        source_map,
        relative_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_self_check_passes() {
        assert!(self_check().is_ok());
    }

    #[test]
    fn test_invalid_bytes_produce_no_output() {
        let resource = ResourceIdentity::new("/proj/a.txt", "/proj");
        let result = transform_bytes(b"ok\n\xc3\x28", &resource);
        assert!(matches!(result, Err(TransformError::InvalidInput(_))));
    }

    #[test]
    fn test_map_json_is_revision_three() {
        let resource = ResourceIdentity::new("/proj/a.txt", "/proj");
        let json = transform("x", &resource).unwrap().map_json().unwrap();
        assert_eq!(
            json,
            r#"{"version":3,"file":"/proj/a.txt","sources":["a.txt"],"sourcesContent":["x"],"names":[],"mappings":";;EAAA","sourceRoot":""}"#
        );
    }
}
