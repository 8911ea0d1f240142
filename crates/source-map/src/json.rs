//! Revision 3 JSON form of a [`SourceMap`].

use crate::{decode_mappings, encode_mappings, SourceMap, SourceMapError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const VERSION: u32 = 3;

/// The serialized shape, in the field order tools conventionally emit.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    version: u32,
    #[serde(default)]
    file: String,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    sources_content: Vec<Option<String>>,
    #[serde(default)]
    names: Vec<String>,
    mappings: String,
    #[serde(default)]
    source_root: String,
}

impl SourceMap {
    /// Serializes this map to compact JSON.
    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    /// Serializes this map to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }

    /// Parses a revision 3 source map.
    ///
    /// `sourceRoot` and `names` are accepted but not retained.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        if raw.version != VERSION {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let mut contents = raw.sources_content.into_iter();
        let mut sources = IndexMap::with_capacity(raw.sources.len());
        for path in &raw.sources {
            let content = contents.next().flatten();
            let slot = sources.entry(path.clone()).or_insert(None);
            if slot.is_none() {
                *slot = content;
            }
        }

        let mut mappings = decode_mappings(&raw.mappings)?;
        for mapping in &mut mappings {
            // Listing the same path twice collapses to one entry
            let path = raw.sources.get(mapping.source as usize).ok_or(
                SourceMapError::SourceIndexOutOfRange {
                    index: mapping.source,
                    count: raw.sources.len(),
                },
            )?;
            if let Some(index) = sources.get_index_of(path) {
                mapping.source = index as u32;
            }
        }

        Ok(SourceMap::from_parts(raw.file, sources, mappings))
    }

    fn to_raw(&self) -> RawSourceMap {
        let entries = self.source_entries();
        RawSourceMap {
            version: VERSION,
            file: self.file().to_string(),
            sources: entries.keys().cloned().collect(),
            sources_content: entries.values().cloned().collect(),
            names: Vec::new(),
            mappings: encode_mappings(self.mappings()),
            source_root: String::new(),
        }
    }
}
