//! Documents: chunk text plus descriptive metadata for downstream indexing.

use crate::chunk::Chunk;
use crate::headers::Breadcrumb;
use crate::placeholder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Descriptive and structural metadata of a document or document chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Identifier of the source document
    #[serde(default)]
    pub uuid: Uuid,

    #[serde(default)]
    pub name: String,

    /// Where the content came from (path, URL, "generated")
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_uuid: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Free-form caller metadata
    #[serde(default)]
    pub additional: Map<String, Value>,

    /// Framed token count, set for chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,

    #[serde(default)]
    pub headers: Breadcrumb,

    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Byte range in the source document, set for chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<(usize, usize)>,
}

/// Text with its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Wrap a chunk, inheriting descriptive fields from `base`.
    ///
    /// `type` defaults to `"text"` and `contentType` to `"chunk"`; the
    /// description is always cleared.
    pub fn from_chunk(chunk: Chunk, base: Option<&DocumentMetadata>) -> Self {
        let DocumentMetadata {
            uuid,
            name,
            source,
            conversation_uuid,
            mime_type,
            additional,
            kind,
            content_type,
            ..
        } = base.cloned().unwrap_or_default();

        let meta = chunk.metadata;

        Self {
            text: chunk.text,
            metadata: DocumentMetadata {
                uuid,
                name,
                source,
                description: String::new(),
                conversation_uuid,
                mime_type,
                additional,
                tokens: Some(meta.token_count),
                headers: meta.headers,
                urls: meta.urls,
                images: meta.images,
                kind: Some(kind.unwrap_or_else(|| "text".to_string())),
                content_type: Some(content_type.unwrap_or_else(|| "chunk".to_string())),
                byte_range: Some(meta.byte_range),
            },
        }
    }

    /// Standalone document for generated content.
    ///
    /// Recognized override keys: `source`, `name`, `mimeType`,
    /// `conversation_uuid`. All overrides are also kept as `additional`.
    pub fn generated(content: impl Into<String>, overrides: Option<&Map<String, Value>>) -> Self {
        let lookup = |key: &str| {
            overrides
                .and_then(|map| map.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let conversation_uuid =
            lookup("conversation_uuid").and_then(|raw| match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("Ignoring invalid conversation_uuid '{}': {}", raw, e);
                    None
                }
            });

        Self {
            text: content.into(),
            metadata: DocumentMetadata {
                source: lookup("source").unwrap_or_else(|| "generated".to_string()),
                name: lookup("name").unwrap_or_else(|| "Generated Document".to_string()),
                mime_type: Some(lookup("mimeType").unwrap_or_else(|| "text/plain".to_string())),
                conversation_uuid,
                additional: overrides.cloned().unwrap_or_default(),
                ..Default::default()
            },
        }
    }

    /// Replace placeholders in the text with this document's own targets.
    pub fn restore_placeholders(self) -> Self {
        let text = placeholder::restore(&self.text, &self.metadata.urls, &self.metadata.images);
        Self { text, ..self }
    }
}
