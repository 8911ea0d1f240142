//! Source map error types.

use thiserror::Error;

/// An error produced while encoding, decoding or parsing a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The `mappings` string is not valid Base64 VLQ.
    #[error("invalid VLQ mappings at byte {position}: {message}")]
    InvalidVlq {
        /// Byte offset into the `mappings` string.
        position: usize,
        /// A description of the problem.
        message: String,
    },

    /// Only revision 3 source maps are understood.
    #[error("unsupported source map version {0}, expected 3")]
    UnsupportedVersion(u32),

    /// A mapping refers to a source that is not listed in `sources`.
    #[error("mapping refers to source #{index} but only {count} sources are listed")]
    SourceIndexOutOfRange {
        /// The source index found in the mapping.
        index: u32,
        /// The number of entries in `sources`.
        count: usize,
    },

    /// A text is too large for 32-bit byte offsets.
    #[error("text of {len} bytes is too large, offsets are limited to 4 GiB")]
    TextTooLarge {
        /// The offending length or offset.
        len: usize,
    },

    /// The JSON document is malformed.
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),
}
