//! Token counting with chat framing.
//!
//! A [`Tokenizer`] turns raw text into a token count. [`TokenCounter`] wraps
//! one and frames the text the way a chat message is framed before it reaches
//! a model, so that chunk budgets account for that overhead.

use chunkwise_core::{AppError, AppResult};
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Opens a chat message.
pub const IM_START: &str = "<|im_start|>";

/// Closes a chat message.
pub const IM_END: &str = "<|im_end|>";

/// Separates role and content in some chat formats.
pub const IM_SEP: &str = "<|im_sep|>";

/// Chat markers that always count as a single token.
pub const CHAT_MARKERS: [&str; 3] = [IM_START, IM_END, IM_SEP];

/// Counts tokens in raw text.
///
/// Implementations must treat every [`CHAT_MARKERS`] occurrence as exactly
/// one token and must be pure: the same text always yields the same count.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> AppResult<usize>;
}

/// A piece of text between chat markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Marker(&'a str),
    Text(&'a str),
}

/// Split `text` into ordinary runs and chat markers, in order.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let next = CHAT_MARKERS
            .iter()
            .filter_map(|marker| rest.find(marker).map(|idx| (idx, *marker)))
            .min_by_key(|(idx, _)| *idx);

        match next {
            Some((idx, marker)) => {
                if idx > 0 {
                    out.push(Segment::Text(&rest[..idx]));
                }
                out.push(Segment::Marker(marker));
                rest = &rest[idx + marker.len()..];
            }
            None => {
                out.push(Segment::Text(rest));
                break;
            }
        }
    }

    out
}

/// BPE tokenizer selected by model identifier.
pub struct TiktokenTokenizer {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Build the tokenizer used by `model`.
    ///
    /// Fails when no encoding is known for the identifier.
    pub fn for_model(model: &str) -> AppResult<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            AppError::Tokenizer(format!("No tokenizer for model '{}': {}", model, e))
        })?;

        tracing::debug!("Loaded tokenizer for model '{}'", model);

        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    /// Model identifier this tokenizer was built for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count(&self, text: &str) -> AppResult<usize> {
        let total = segments(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Marker(_) => 1,
                Segment::Text(run) => self.bpe.encode_ordinary(run).len(),
            })
            .sum();
        Ok(total)
    }
}

/// Deterministic tokenizer: one token per whitespace-separated word.
///
/// Needs no vocabulary, which makes budgets easy to reason about offline and
/// in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count(&self, text: &str) -> AppResult<usize> {
        let total = segments(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Marker(_) => 1,
                Segment::Text(run) => run.split_whitespace().count(),
            })
            .sum();
        Ok(total)
    }
}

/// Frame `text` as a single user turn followed by an empty assistant turn.
pub fn frame(text: &str) -> String {
    format!(
        "{IM_START}user\n{text}{IM_END}\n{IM_START}assistant{IM_END}",
        IM_START = IM_START,
        IM_END = IM_END,
        text = text
    )
}

/// Counts framed tokens through a shared tokenizer.
#[derive(Clone)]
pub struct TokenCounter {
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenCounter {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Counter backed by the BPE tokenizer for `model`.
    pub fn for_model(model: &str) -> AppResult<Self> {
        Ok(Self::new(Arc::new(TiktokenTokenizer::for_model(model)?)))
    }

    /// Token count of `text` once framed.
    pub fn count(&self, text: &str) -> AppResult<usize> {
        self.tokenizer.count(&frame(text))
    }

    /// Token count of `text` as is.
    pub fn count_raw(&self, text: &str) -> AppResult<usize> {
        self.tokenizer.count(text)
    }

    /// Fixed per-call framing cost: the tokens framing adds to an empty text.
    pub fn overhead(&self) -> AppResult<usize> {
        let framed = self.count_raw(&frame(""))?;
        let bare = self.count_raw("")?;
        Ok(framed.saturating_sub(bare))
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter").finish_non_exhaustive()
    }
}
