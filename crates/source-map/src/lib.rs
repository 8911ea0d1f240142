//! Source position tracking and mapping for print-loader.
//!
//! This crate provides the pieces needed to correlate lines of a generated
//! module back to the lines of the file it was generated from: a line index
//! for splitting text, a builder that collects line/column mappings, and the
//! revision 3 JSON format (with its Base64 VLQ `mappings` encoding) that
//! debuggers and other tooling consume.

mod builder;
mod error;
mod json;
mod line_index;
mod vlq;

pub use builder::{Mapping, OriginalPosition, SourceMap, SourceMapBuilder};
pub use error::SourceMapError;
pub use line_index::{ByteOffset, LineCol, LineIndex};
pub use vlq::{decode_mappings, encode_mappings};
