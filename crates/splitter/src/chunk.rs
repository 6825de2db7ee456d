//! Chunk records produced by the splitter.

use crate::headers::Breadcrumb;
use crate::placeholder;
use serde::{Deserialize, Serialize};

/// One bounded slice of a document with its extracted metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text with link and image targets replaced by placeholders
    pub text: String,

    /// Metadata extracted while splitting
    pub metadata: ChunkMetadata,
}

/// Metadata attached to a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Framed token count of the source span
    pub token_count: usize,

    /// Heading breadcrumb as of the end of this chunk
    pub headers: Breadcrumb,

    /// Link targets, indexed by `{$url<i>}` placeholders
    pub urls: Vec<String>,

    /// Image targets, indexed by `{$img<i>}` placeholders
    pub images: Vec<String>,

    /// Byte range of the source span in the split document
    pub byte_range: (usize, usize),
}

impl Chunk {
    /// Chunk text with placeholders replaced by their targets.
    pub fn restored_text(&self) -> String {
        placeholder::restore(&self.text, &self.metadata.urls, &self.metadata.images)
    }

    /// Source span of this chunk in `document`.
    pub fn source<'a>(&self, document: &'a str) -> Option<&'a str> {
        let (start, end) = self.metadata.byte_range;
        document.get(start..end)
    }
}
