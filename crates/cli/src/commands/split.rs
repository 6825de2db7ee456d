//! Split command handler.
//!
//! Splits files and directories into chunk documents, one blocking task per
//! file, and prints them as JSON.

use super::{build_splitter, TokenizerKind};
use chunkwise_core::{config::AppConfig, AppError, AppResult};
use chunkwise_splitter::{Document, DocumentMetadata, TextSplitter};
use clap::Args;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

/// Extensions picked up when walking directories.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Split files into chunk documents
#[derive(Args, Debug)]
pub struct SplitCommand {
    /// Files or directories to split
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print one JSON document per line
    #[arg(long)]
    pub jsonl: bool,

    /// Print restored link and image targets instead of placeholders
    #[arg(long)]
    pub restore: bool,

    /// Tokenizer used for counting
    #[arg(long, value_enum, default_value_t = TokenizerKind::Tiktoken)]
    pub tokenizer: TokenizerKind,
}

impl SplitCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing split command");
        tracing::debug!("Split options: {:?}", self);

        let files = collect_files(&self.paths)?;
        if files.is_empty() {
            tracing::warn!("No supported files found in {:?}", self.paths);
            return Ok(());
        }

        let splitter = build_splitter(&config.splitter, self.tokenizer)?;

        let tasks = files.into_iter().map(|path| {
            let splitter = splitter.clone();
            tokio::task::spawn_blocking(move || split_file(&splitter, &path))
        });

        let mut documents = Vec::new();
        for joined in futures::future::join_all(tasks).await {
            let split = joined.map_err(|e| AppError::Other(format!("Split task failed: {}", e)))?;
            documents.extend(split?);
        }

        if self.restore {
            documents = documents
                .into_iter()
                .map(Document::restore_placeholders)
                .collect();
        }

        tracing::info!("Produced {} documents", documents.len());

        if self.jsonl {
            for document in &documents {
                println!("{}", serde_json::to_string(document)?);
            }
        } else {
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }

        Ok(())
    }
}

/// Expand `paths` into the files to split, in a stable order.
///
/// Files named explicitly are always kept; directories contribute only
/// files with a supported extension.
fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_supported(entry_path) {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Path does not exist: {:?}", path),
            )));
        }
    }

    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") | Some("markdown") => "text/markdown",
        _ => "text/plain",
    }
}

/// Metadata every chunk of `path` inherits.
fn base_metadata(path: &Path) -> DocumentMetadata {
    DocumentMetadata {
        uuid: Uuid::new_v4(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source: path.display().to_string(),
        mime_type: Some(mime_type(path).to_string()),
        ..Default::default()
    }
}

fn split_file(splitter: &TextSplitter, path: &Path) -> AppResult<Vec<Document>> {
    tracing::debug!("Processing file: {:?}", path);

    let text = std::fs::read_to_string(path)?;
    let base = base_metadata(path);
    let documents = splitter.split_document(&text, Some(&base))?;

    tracing::debug!("Split {:?} into {} chunks", path, documents.len());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkwise_core::SplitterSettings;
    use std::fs;
    use tempfile::TempDir;

    fn word_splitter() -> TextSplitter {
        build_splitter(&SplitterSettings::default(), TokenizerKind::Words).unwrap()
    }

    #[test]
    fn test_collect_files_filters_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "# B").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("image.png"), "png").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.MARKDOWN"), "c").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "c.MARKDOWN"]);
    }

    #[test]
    fn test_collect_files_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.rst");
        fs::write(&path, "notes").unwrap();

        assert_eq!(collect_files(&[path.clone()]).unwrap(), vec![path]);
    }

    #[test]
    fn test_collect_files_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.md");
        assert!(matches!(collect_files(&[missing]), Err(AppError::Io(_))));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("a.md")), "text/markdown");
        assert_eq!(mime_type(Path::new("a.markdown")), "text/markdown");
        assert_eq!(mime_type(Path::new("a.txt")), "text/plain");
    }

    #[test]
    fn test_split_file_sets_base_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guide.md");
        fs::write(&path, "# Guide\nSee [docs](http://docs).\n").unwrap();

        let documents = split_file(&word_splitter(), &path).unwrap();
        assert_eq!(documents.len(), 1);

        let meta = &documents[0].metadata;
        assert_eq!(meta.name, "guide.md");
        assert_eq!(meta.source, path.display().to_string());
        assert_eq!(meta.mime_type.as_deref(), Some("text/markdown"));
        assert_eq!(meta.urls, vec!["http://docs"]);
        assert!(!meta.uuid.is_nil());
    }
}
