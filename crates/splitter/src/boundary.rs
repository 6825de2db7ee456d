//! Chunk boundary search.
//!
//! Finding the end of the next chunk happens in three named steps:
//! 1. [`BoundaryFinder::estimate_end`] guesses a span from the token density
//!    of the remaining text;
//! 2. [`BoundaryFinder::shrink_to_budget`] trims the window until its raw
//!    count plus the framing overhead fits the limit;
//! 3. [`BoundaryFinder::snap_to_line_break`] moves the end just past a nearby
//!    newline when that keeps the chunk within budget and well filled.
//!
//! Offsets are byte offsets and always land on UTF-8 character boundaries.

use crate::token::TokenCounter;
use chunkwise_core::AppResult;

/// Largest char boundary of `text` that is `<= idx`.
pub(crate) fn floor_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// End offset of a chunk holding only the first character after `start`.
pub(crate) fn min_end(text: &str, start: usize) -> usize {
    start + text[start..].chars().next().map_or(0, char::len_utf8)
}

/// Computes chunk end offsets against a token budget.
#[derive(Debug, Clone)]
pub struct BoundaryFinder {
    counter: TokenCounter,
    overhead: usize,
    min_fill_ratio: f64,
    shrink_ratio: f64,
}

impl BoundaryFinder {
    /// Build a finder, measuring the framing overhead once.
    pub fn new(counter: TokenCounter, min_fill_ratio: f64, shrink_ratio: f64) -> AppResult<Self> {
        let overhead = counter.overhead()?;
        tracing::debug!("Framing overhead: {} tokens", overhead);

        Ok(Self {
            counter,
            overhead,
            min_fill_ratio,
            shrink_ratio,
        })
    }

    pub fn overhead(&self) -> usize {
        self.overhead
    }

    /// End offset of the chunk starting at `start`.
    ///
    /// Always returns `end` with `start < end <= text.len()` when
    /// `start < text.len()`.
    pub fn next_end(&self, text: &str, start: usize, limit: usize) -> AppResult<usize> {
        let estimated = self.estimate_end(text, start, limit)?;
        let within_budget = self.shrink_to_budget(text, start, estimated, limit)?;
        let end = self.snap_to_line_break(text, start, within_budget, limit)?;

        tracing::debug!(
            start,
            estimated,
            within_budget,
            end,
            "Chunk boundary found"
        );

        Ok(end)
    }

    /// Proportional guess: scale the remaining span by `limit / tail_tokens`.
    pub fn estimate_end(&self, text: &str, start: usize, limit: usize) -> AppResult<usize> {
        let tail = &text[start..];
        let tail_tokens = self.counter.count(tail)?;

        let span = if tail_tokens == 0 {
            tail.len()
        } else {
            (tail.len() as f64 * limit as f64 / tail_tokens as f64).floor() as usize
        };

        let end = floor_char_boundary(text, start.saturating_add(span));
        Ok(end.max(min_end(text, start)))
    }

    /// Drop the tail of `[start, end)` until it fits the budget.
    ///
    /// The window fits when its raw token count plus the framing overhead is
    /// within `limit`. Each pass removes `shrink_ratio` of the window, at
    /// least one character. Stops at a single character even if that still
    /// exceeds the budget.
    pub fn shrink_to_budget(
        &self,
        text: &str,
        start: usize,
        end: usize,
        limit: usize,
    ) -> AppResult<usize> {
        let floor = min_end(text, start);
        let mut end = end;
        let mut tokens = self.counter.count_raw(&text[start..end])?;

        while tokens + self.overhead > limit && end > floor {
            let window = end - start;
            let cut = ((window as f64 * self.shrink_ratio).floor() as usize).max(1);
            end = floor_char_boundary(text, end - cut).max(floor);
            tokens = self.counter.count_raw(&text[start..end])?;

            tracing::trace!(
                end,
                tokens,
                overhead = self.overhead,
                limit,
                "Shrinking chunk window"
            );
        }

        if tokens + self.overhead > limit {
            tracing::warn!(
                start,
                end,
                tokens,
                limit,
                "Single character exceeds the token budget"
            );
        }

        Ok(end)
    }

    /// Move `end` just past a newline if the resulting chunk fills at least
    /// `min_fill_ratio` of the budget without exceeding it.
    ///
    /// The next newline at or after `end` is tried first, then the last one
    /// before `end` that lies strictly after `start`. A chunk that already
    /// reaches the end of the text is left alone.
    pub fn snap_to_line_break(
        &self,
        text: &str,
        start: usize,
        end: usize,
        limit: usize,
    ) -> AppResult<usize> {
        if end >= text.len() {
            return Ok(end);
        }

        let min_tokens = limit as f64 * self.min_fill_ratio;

        if let Some(offset) = text[end..].find('\n') {
            let extended = end + offset + 1;
            if self.fills_budget(text, start, extended, limit, min_tokens)? {
                tracing::trace!(extended, "Extending chunk to next newline");
                return Ok(extended);
            }
        }

        if let Some(newline) = text[..end].rfind('\n') {
            if newline > start {
                let reduced = newline + 1;
                if self.fills_budget(text, start, reduced, limit, min_tokens)? {
                    tracing::trace!(reduced, "Reducing chunk to previous newline");
                    return Ok(reduced);
                }
            }
        }

        Ok(end)
    }

    fn fills_budget(
        &self,
        text: &str,
        start: usize,
        end: usize,
        limit: usize,
        min_tokens: f64,
    ) -> AppResult<bool> {
        let tokens = self.counter.count(&text[start..end])?;
        Ok(tokens <= limit && tokens as f64 >= min_tokens)
    }
}
