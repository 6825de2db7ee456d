//! Command handlers for the chunkwise CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod count;
pub mod restore;
pub mod split;

// Re-export command types for convenience
pub use count::CountCommand;
pub use restore::RestoreCommand;
pub use split::SplitCommand;

use chunkwise_core::{AppResult, SplitterSettings};
use chunkwise_splitter::{SplitConfig, TextSplitter, TokenCounter, WhitespaceTokenizer};
use clap::ValueEnum;
use std::sync::Arc;

/// Tokenizer backing every count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizerKind {
    /// BPE encoding of the configured model
    Tiktoken,
    /// One token per whitespace-separated word, model is ignored
    Words,
}

pub fn build_counter(settings: &SplitterSettings, kind: TokenizerKind) -> AppResult<TokenCounter> {
    match kind {
        TokenizerKind::Tiktoken => TokenCounter::for_model(&settings.model),
        TokenizerKind::Words => Ok(TokenCounter::new(Arc::new(WhitespaceTokenizer))),
    }
}

pub fn build_splitter(settings: &SplitterSettings, kind: TokenizerKind) -> AppResult<TextSplitter> {
    let counter = build_counter(settings, kind)?;
    TextSplitter::new(counter, SplitConfig::from(settings))
}
