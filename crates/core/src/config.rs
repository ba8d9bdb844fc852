//! Configuration management for the CDP support chatbot.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - An optional YAML config file (`cdp-support.yaml`)
//!
//! Precedence, lowest to highest: YAML file, environment, CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default number of documentation chunks to retrieve per query.
fn default_top_n() -> usize {
    5
}

/// Default minimum cosine similarity for a chunk to be considered relevant.
fn default_min_score() -> f32 {
    0.1
}

/// Main application configuration.
///
/// Holds all global options that affect both the `serve` and `ask` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain `.cdp-support/` overrides)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider (currently only "gemini")
    pub provider: String,

    /// Model identifier for the generation provider
    pub model: String,

    /// Optional provider endpoint override
    pub endpoint: Option<String>,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Path of the documentation snapshot file
    pub cache_path: PathBuf,

    /// Bind address for the `serve` command
    pub bind: String,

    /// Number of chunks retrieved per query
    pub top_n: usize,

    /// Minimum relevance score; chunks at or below are dropped
    pub min_score: f32,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    corpus: Option<CorpusSection>,
    retrieval: Option<RetrievalSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CorpusSection {
    #[serde(rename = "cachePath")]
    cache_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "topN")]
    top_n: Option<usize>,
    #[serde(rename = "minScore")]
    min_score: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: None,
            api_key: None,
            cache_path: PathBuf::from("cdp_documentation_cache.json"),
            bind: "127.0.0.1:8080".to_string(),
            top_n: default_top_n(),
            min_score: default_min_score(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CDP_SUPPORT_WORKSPACE`: Override workspace path
    /// - `CDP_SUPPORT_CONFIG`: Path to config file
    /// - `CDP_SUPPORT_PROVIDER`: Generation provider
    /// - `CDP_SUPPORT_MODEL`: Model identifier
    /// - `CDP_SUPPORT_ENDPOINT`: Provider endpoint override
    /// - `GEMINI_API_KEY`: Generation API key
    /// - `CDP_SUPPORT_CACHE`: Documentation snapshot path
    /// - `CDP_SUPPORT_BIND`: Serve bind address
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("CDP_SUPPORT_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("CDP_SUPPORT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        // Merge YAML config file if present
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join("cdp-support.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("CDP_SUPPORT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("CDP_SUPPORT_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("CDP_SUPPORT_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(cache) = std::env::var("CDP_SUPPORT_CACHE") {
            config.cache_path = PathBuf::from(cache);
        }

        if let Ok(bind) = std::env::var("CDP_SUPPORT_BIND") {
            config.bind = bind;
        }

        config.api_key = std::env::var("GEMINI_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
        }

        if let Some(corpus) = config_file.corpus {
            if let Some(cache_path) = corpus.cache_path {
                result.cache_path = PathBuf::from(cache_path);
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(top_n) = retrieval.top_n {
                result.top_n = top_n;
            }
            if let Some(min_score) = retrieval.min_score {
                result.min_score = min_score;
            }
        }

        if let Some(server) = config_file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the YAML
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the generation API key, failing if it is absent.
    ///
    /// A missing credential is a startup error, not a per-request error.
    pub fn require_api_key(&self) -> AppResult<String> {
        self.api_key.clone().ok_or_else(|| {
            AppError::Config(
                "GEMINI_API_KEY environment variable not set. \
                 Set it in your environment before starting the service."
                    .to_string(),
            )
        })
    }

    /// Validate configuration for the active provider and retrieval tuning.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["gemini"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.top_n == 0 {
            return Err(AppError::Config(
                "retrieval.topN must be at least 1".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.min_score) {
            return Err(AppError::Config(format!(
                "retrieval.minScore must be in [0, 1): {}",
                self.min_score
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.min_score, 0.1);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("gemini".to_string()),
            Some("gemini-1.5-pro".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.model, "gemini-1.5-pro");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig {
            api_key: None,
            ..AppConfig::default()
        };
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_require_api_key_present() {
        let config = AppConfig {
            api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "test-key");
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_tuning() {
        let config = AppConfig {
            top_n: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            min_score: 1.5,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
