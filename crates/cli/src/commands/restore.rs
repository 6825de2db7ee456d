//! Restore command handler.

use chunkwise_core::AppResult;
use chunkwise_splitter::Document;
use clap::Args;
use std::path::{Path, PathBuf};

/// Restore link and image targets in split documents
#[derive(Args, Debug)]
pub struct RestoreCommand {
    /// JSON file holding an array of documents, as printed by `split`
    pub file: PathBuf,

    /// Print restored documents as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl RestoreCommand {
    pub async fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing restore command");
        tracing::debug!("Restore options: {:?}", self);

        let documents = load_restored(&self.file)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&documents)?);
        } else {
            for document in &documents {
                println!("{}", document.text);
            }
        }

        Ok(())
    }
}

fn load_restored(path: &Path) -> AppResult<Vec<Document>> {
    let contents = std::fs::read_to_string(path)?;
    let documents: Vec<Document> = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded {} documents from {:?}", documents.len(), path);

    Ok(documents
        .into_iter()
        .map(Document::restore_placeholders)
        .collect())
}
