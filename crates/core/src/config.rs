//! Configuration management for chunkwise.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.chunkwise/config.yaml or `CHUNKWISE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default model identifier used to select the tokenizer.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default maximum tokens per chunk, framing included.
pub const DEFAULT_LIMIT: usize = 512;

/// Default minimum fraction of the budget a line-snapped chunk must fill.
pub const DEFAULT_MIN_FILL_RATIO: f64 = 0.8;

/// Default fraction of the window dropped per shrink iteration.
pub const DEFAULT_SHRINK_RATIO: f64 = 0.1;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Splitter settings
    pub splitter: SplitterSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Settings consumed by the text splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterSettings {
    /// Model identifier passed to the tokenizer for every count
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per chunk, framing included
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum fill ratio for line-break snapping
    #[serde(default = "default_min_fill_ratio")]
    pub min_fill_ratio: f64,

    /// Window fraction dropped per shrink iteration
    #[serde(default = "default_shrink_ratio")]
    pub shrink_ratio: f64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_fill_ratio() -> f64 {
    DEFAULT_MIN_FILL_RATIO
}

fn default_shrink_ratio() -> f64 {
    DEFAULT_SHRINK_RATIO
}

impl Default for SplitterSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            limit: default_limit(),
            min_fill_ratio: default_min_fill_ratio(),
            shrink_ratio: default_shrink_ratio(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    splitter: Option<SplitterSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            splitter: SplitterSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration relative to the current directory.
    ///
    /// Environment variables:
    /// - `CHUNKWISE_CONFIG`: Path to config file
    /// - `CHUNKWISE_MODEL`: Model identifier
    /// - `CHUNKWISE_LIMIT`: Token limit per chunk
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use chunkwise_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Model: {}", config.splitter.model);
    /// ```
    pub fn load() -> AppResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_in(&cwd)
    }

    /// Load configuration, looking for `.chunkwise/config.yaml` under `dir`.
    pub fn load_in(dir: &Path) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("CHUNKWISE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => dir.join(".chunkwise/config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("CHUNKWISE_MODEL") {
            config.splitter.model = model;
        }

        if let Ok(limit) = std::env::var("CHUNKWISE_LIMIT") {
            config.splitter.limit = parse_limit(&limit)?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(splitter) = config_file.splitter {
            result.splitter = splitter;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        model: Option<String>,
        limit: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = model {
            self.splitter.model = model;
        }

        if let Some(limit) = limit {
            self.splitter.limit = limit;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Validate the splitter settings.
    ///
    /// A limit below the framing overhead is accepted: the splitter still
    /// makes progress one character at a time.
    pub fn validate(&self) -> AppResult<()> {
        let settings = &self.splitter;

        if settings.model.trim().is_empty() {
            return Err(AppError::Config(
                "Model identifier must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("minFillRatio", settings.min_fill_ratio),
            ("shrinkRatio", settings.shrink_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AppError::Config(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if settings.limit == 0 {
            tracing::warn!("Token limit is 0; every chunk will be a single character");
        }

        Ok(())
    }
}

fn parse_limit(raw: &str) -> AppResult<usize> {
    raw.trim().parse::<usize>().map_err(|e| {
        AppError::Config(format!("Invalid CHUNKWISE_LIMIT '{}': {}", raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.splitter.model, "gpt-4o");
        assert_eq!(config.splitter.limit, 512);
        assert_eq!(config.splitter.min_fill_ratio, 0.8);
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert!(!config.log_json);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            Some("gpt-4".to_string()),
            Some(256),
            None,
            true,
            false,
            true,
        );

        assert_eq!(overridden.splitter.model, "gpt-4");
        assert_eq!(overridden.splitter.limit, 256);
        assert!(overridden.verbose);
        assert!(overridden.log_json);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "splitter:\n  model: gpt-3.5-turbo\n  limit: 128\nlogging:\n  level: trace\n  color: false\n",
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.splitter.model, "gpt-3.5-turbo");
        assert_eq!(merged.splitter.limit, 128);
        // Unspecified keys fall back to their defaults
        assert_eq!(merged.splitter.shrink_ratio, 0.1);
        assert_eq!(merged.log_level, Some("trace".to_string()));
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_yaml_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "splitter:\n  limit: lots\n").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = AppConfig::default();
        config.splitter.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ratio_bounds() {
        let mut config = AppConfig::default();
        config.splitter.min_fill_ratio = 1.5;
        assert!(config.validate().is_err());

        config.splitter.min_fill_ratio = 0.8;
        config.splitter.shrink_ratio = 0.0;
        assert!(config.validate().is_err());

        config.splitter.shrink_ratio = 0.1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(" 64 ").unwrap(), 64);
        assert!(parse_limit("-1").is_err());
    }
}
