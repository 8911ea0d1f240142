//! Transform error types.

use camino::Utf8PathBuf;
use source_map::SourceMapError;
use thiserror::Error;

/// An error that prevents a transform from producing its output.
///
/// A transform either returns both the generated code and its source map or
/// one of these errors; nothing partial is ever returned.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    /// The source is not a text document this crate can index.
    #[error("{0}")]
    InvalidInput(String),

    /// The resource path cannot be expressed relative to the working directory.
    #[error("cannot make {resource} relative to {working_directory}: {reason}")]
    InvalidResource {
        /// The resource being transformed.
        resource: Utf8PathBuf,
        /// The directory the relative path is computed from.
        working_directory: Utf8PathBuf,
        /// Why the relative path could not be computed.
        reason: &'static str,
    },

    /// The template's header length disagrees with where statements are rendered.
    #[error("template inconsistency: first statement expected at {expected}, found at {found}")]
    TemplateInconsistency {
        /// Line:column implied by the template definition.
        expected: String,
        /// Line:column observed in rendered output.
        found: String,
    },

    /// The source map could not be serialized.
    #[error("source map error: {0}")]
    SourceMap(String),
}

impl From<std::str::Utf8Error> for TransformError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::InvalidInput(format!("source is not valid UTF-8: {error}"))
    }
}

impl From<SourceMapError> for TransformError {
    fn from(error: SourceMapError) -> Self {
        Self::SourceMap(error.to_string())
    }
}
