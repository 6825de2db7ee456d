//! Token-budgeted document splitting.
//!
//! Splits markdown-like documents into chunks that fit a model's token
//! budget, carrying a header breadcrumb across chunks and moving link/image
//! targets into per-chunk lists behind reversible placeholders.
//!
//! ```no_run
//! use chunkwise_splitter::{SplitConfig, TextSplitter, TokenCounter};
//!
//! let counter = TokenCounter::for_model("gpt-4o").expect("tokenizer");
//! let splitter = TextSplitter::new(counter, SplitConfig::default()).expect("splitter");
//! for chunk in splitter.split("# Title\nBody text.").expect("split") {
//!     println!("{:?} {}", chunk.metadata.headers.trail(), chunk.text);
//! }
//! ```

pub mod boundary;
pub mod chunk;
pub mod document;
pub mod headers;
pub mod placeholder;
pub mod splitter;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use boundary::BoundaryFinder;
pub use chunk::{Chunk, ChunkMetadata};
pub use document::{Document, DocumentMetadata};
pub use headers::{extract_headings, Breadcrumb, HeadingMap};
pub use placeholder::{extract, restore, Extraction};
pub use splitter::{SplitConfig, Step, TextSplitter};
pub use token::{TiktokenTokenizer, TokenCounter, Tokenizer, WhitespaceTokenizer};

use chunkwise_core::AppResult;

/// Split `text` with the tokenizer for `model` and default ratios.
pub fn split_text(text: &str, limit: usize, model: &str) -> AppResult<Vec<Chunk>> {
    let counter = TokenCounter::for_model(model)?;
    let config = SplitConfig {
        limit,
        ..Default::default()
    };
    TextSplitter::new(counter, config)?.split(text)
}
