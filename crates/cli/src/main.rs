//! Chunkwise CLI
//!
//! Main entry point for the chunkwise command-line tool.
//! Splits markdown documents into token-budgeted chunks.

mod commands;

use clap::{Parser, Subcommand};
use chunkwise_core::{config::AppConfig, logging, AppResult};
use commands::{CountCommand, RestoreCommand, SplitCommand};
use std::path::PathBuf;

/// Chunkwise - split documents into chunks that fit a model's token budget
#[derive(Parser, Debug)]
#[command(name = "chunkwise")]
#[command(about = "Split documents into token-budgeted chunks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Model identifier used to select the tokenizer
    #[arg(short, long, global = true, env = "CHUNKWISE_MODEL")]
    model: Option<String>,

    /// Maximum tokens per chunk, framing included
    #[arg(short, long, global = true, env = "CHUNKWISE_LIMIT")]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split files into chunk documents
    Split(SplitCommand),

    /// Restore link and image targets in split documents
    Restore(RestoreCommand),

    /// Count framed tokens in a file
    Count(CountCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let mut config = AppConfig::load()?;
    if let Some(ref path) = cli.config {
        config = config.merge_yaml(path)?;
    }

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.model,
        cli.limit,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    config.validate()?;

    tracing::info!("Chunkwise CLI starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Model: {}", config.splitter.model);
    tracing::debug!("Limit: {}", config.splitter.limit);

    let command_name = match &cli.command {
        Commands::Split(_) => "split",
        Commands::Restore(_) => "restore",
        Commands::Count(_) => "count",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Split(cmd) => cmd.execute(&config).await,
        Commands::Restore(cmd) => cmd.execute().await,
        Commands::Count(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
