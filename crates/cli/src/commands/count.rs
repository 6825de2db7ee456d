//! Count command handler.

use super::{build_counter, TokenizerKind};
use chunkwise_core::{config::AppConfig, AppResult};
use chunkwise_splitter::TokenCounter;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Count framed tokens in a file
#[derive(Args, Debug)]
pub struct CountCommand {
    /// File to count
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Tokenizer used for counting
    #[arg(long, value_enum, default_value_t = TokenizerKind::Tiktoken)]
    pub tokenizer: TokenizerKind,
}

/// Token counts of one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counts {
    framed: usize,
    raw: usize,
    overhead: usize,
}

impl CountCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing count command");
        tracing::debug!("Count options: {:?}", self);

        let text = std::fs::read_to_string(&self.file)?;
        let counter = build_counter(&config.splitter, self.tokenizer)?;
        let counts = count_text(&counter, &text)?;

        if self.json {
            let value = json!({
                "file": self.file.display().to_string(),
                "model": config.splitter.model,
                "tokens": counts.framed,
                "raw": counts.raw,
                "overhead": counts.overhead,
                "limit": config.splitter.limit,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("Tokens:   {}", counts.framed);
            println!("Raw:      {}", counts.raw);
            println!("Overhead: {}", counts.overhead);
            if counts.framed > config.splitter.limit {
                println!(
                    "Exceeds the limit of {} tokens; split will produce several chunks",
                    config.splitter.limit
                );
            }
        }

        Ok(())
    }
}

fn count_text(counter: &TokenCounter, text: &str) -> AppResult<Counts> {
    Ok(Counts {
        framed: counter.count(text)?,
        raw: counter.count_raw(text)?,
        overhead: counter.overhead()?,
    })
}
