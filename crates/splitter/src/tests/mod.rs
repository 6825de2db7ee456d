//! Cross-module tests for the splitter.

mod scenarios;

use crate::splitter::{SplitConfig, TextSplitter};
use crate::token::{TokenCounter, WhitespaceTokenizer};
use std::sync::Arc;

/// Splitter over the whitespace tokenizer: framed count = 6 + words.
pub(crate) fn word_splitter(limit: usize) -> TextSplitter {
    let counter = TokenCounter::new(Arc::new(WhitespaceTokenizer));
    TextSplitter::new(
        counter,
        SplitConfig {
            limit,
            ..Default::default()
        },
    )
    .unwrap()
}
