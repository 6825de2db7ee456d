//! Token-budgeted document splitter.

use crate::boundary::BoundaryFinder;
use crate::chunk::{Chunk, ChunkMetadata};
use crate::document::{Document, DocumentMetadata};
use crate::headers::{extract_headings, Breadcrumb};
use crate::placeholder;
use crate::token::TokenCounter;
use chunkwise_core::config::{DEFAULT_LIMIT, DEFAULT_MIN_FILL_RATIO, DEFAULT_SHRINK_RATIO};
use chunkwise_core::{AppError, AppResult, SplitterSettings};

/// Configuration for the splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Maximum tokens per chunk, framing included
    pub limit: usize,

    /// Minimum budget fraction a line-snapped chunk must fill
    pub min_fill_ratio: f64,

    /// Window fraction dropped per shrink iteration
    pub shrink_ratio: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_fill_ratio: DEFAULT_MIN_FILL_RATIO,
            shrink_ratio: DEFAULT_SHRINK_RATIO,
        }
    }
}

impl From<&SplitterSettings> for SplitConfig {
    fn from(settings: &SplitterSettings) -> Self {
        Self {
            limit: settings.limit,
            min_fill_ratio: settings.min_fill_ratio,
            shrink_ratio: settings.shrink_ratio,
        }
    }
}

/// Result of one splitting step.
#[derive(Debug, Clone)]
pub struct Step {
    pub chunk: Chunk,
    /// Offset where the next step starts
    pub end: usize,
    /// Breadcrumb to thread into the next step
    pub breadcrumb: Breadcrumb,
}

/// Splits documents into chunks that fit a token budget.
///
/// The splitter holds no per-document state: the breadcrumb is threaded
/// through [`TextSplitter::step`] by the caller, so one splitter can serve
/// many documents concurrently.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    counter: TokenCounter,
    finder: BoundaryFinder,
    config: SplitConfig,
}

impl TextSplitter {
    pub fn new(counter: TokenCounter, config: SplitConfig) -> AppResult<Self> {
        if !(config.min_fill_ratio > 0.0 && config.min_fill_ratio <= 1.0) {
            return Err(AppError::Split(format!(
                "min_fill_ratio must be in (0, 1], got {}",
                config.min_fill_ratio
            )));
        }
        if !(config.shrink_ratio > 0.0 && config.shrink_ratio <= 1.0) {
            return Err(AppError::Split(format!(
                "shrink_ratio must be in (0, 1], got {}",
                config.shrink_ratio
            )));
        }

        let finder = BoundaryFinder::new(
            counter.clone(),
            config.min_fill_ratio,
            config.shrink_ratio,
        )?;

        Ok(Self {
            counter,
            finder,
            config,
        })
    }

    /// Splitter backed by the BPE tokenizer for `settings.model`.
    ///
    /// Every count in every split goes through that one tokenizer.
    pub fn from_settings(settings: &SplitterSettings) -> AppResult<Self> {
        let counter = TokenCounter::for_model(&settings.model)?;
        Self::new(counter, SplitConfig::from(settings))
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    /// Split `text` into chunks, in document order.
    ///
    /// Empty input yields no chunks.
    pub fn split(&self, text: &str) -> AppResult<Vec<Chunk>> {
        tracing::debug!(
            "Starting split of {} bytes with limit {} tokens",
            text.len(),
            self.config.limit
        );

        let mut chunks = Vec::new();
        let mut position = 0;
        let mut breadcrumb = Breadcrumb::new();

        while position < text.len() {
            let step = self.step(text, position, breadcrumb)?;
            tracing::debug!(
                position,
                end = step.end,
                tokens = step.chunk.metadata.token_count,
                "Chunk processed"
            );

            chunks.push(step.chunk);
            breadcrumb = step.breadcrumb;
            position = step.end;
        }

        tracing::info!(
            "Split complete: {} chunks created from {} bytes",
            chunks.len(),
            text.len()
        );

        Ok(chunks)
    }

    /// Produce the chunk starting at `position`.
    ///
    /// `breadcrumb` is the state after the previous chunk; the returned step
    /// carries the state after this one.
    pub fn step(&self, text: &str, position: usize, breadcrumb: Breadcrumb) -> AppResult<Step> {
        if position >= text.len() || !text.is_char_boundary(position) {
            return Err(AppError::Split(format!(
                "Invalid chunk start {} for text of {} bytes",
                position,
                text.len()
            )));
        }

        let end = self.finder.next_end(text, position, self.config.limit)?;
        let source = &text[position..end];

        let breadcrumb = breadcrumb.merge(&extract_headings(source));
        let extraction = placeholder::extract(source);
        let token_count = self.counter.count(source)?;

        let chunk = Chunk {
            text: extraction.text,
            metadata: ChunkMetadata {
                token_count,
                headers: breadcrumb.clone(),
                urls: extraction.urls,
                images: extraction.images,
                byte_range: (position, end),
            },
        };

        Ok(Step {
            chunk,
            end,
            breadcrumb,
        })
    }

    /// Split `text` into documents that inherit `base` metadata.
    pub fn split_document(
        &self,
        text: &str,
        base: Option<&DocumentMetadata>,
    ) -> AppResult<Vec<Document>> {
        let documents = self
            .split(text)?
            .into_iter()
            .map(|chunk| Document::from_chunk(chunk, base))
            .collect();
        Ok(documents)
    }
}
