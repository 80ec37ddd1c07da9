//! TOML configuration for the pipeline and its sources.
//!
//! The file lives in the OS-standard config directory:
//! - Windows: %APPDATA%\bib-enrich\config.toml
//! - macOS: ~/Library/Application Support/bib-enrich/config.toml
//! - Linux: ~/.config/bib-enrich/config.toml
//!
//! The config file is human-readable and editable. Per-source settings
//! left unset fall back to defaults tuned to each API's published limits.
//! Secrets can come from the environment instead of the file:
//! SEMANTIC_SCHOLAR_API_KEY and OPENALEX_EMAIL override their config
//! counterparts when set.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::enrichment::cache::DEFAULT_TTL_DAYS;
use crate::enrichment::retry::RetryPolicy;

/// Environment variable consulted before the config file for the
/// Semantic Scholar API key.
pub const SEMANTIC_SCHOLAR_API_KEY_ENV: &str = "SEMANTIC_SCHOLAR_API_KEY";

/// Environment variable consulted before the config file for the
/// OpenAlex polite-pool contact address.
pub const OPENALEX_MAILTO_ENV: &str = "OPENALEX_EMAIL";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline-wide enrichment settings
    pub enrichment: EnrichmentConfig,

    /// Per-source API settings
    pub sources: SourcesConfig,
}

/// Pipeline-wide enrichment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Master switch; when false no sources are queried at all
    pub enabled: bool,

    /// Serve cached records only, never query for uncached entries
    pub skip_cached: bool,

    /// Minimum title similarity for a search result to count as a match
    pub title_similarity_threshold: f64,

    /// How long cached metadata stays fresh
    pub cache_ttl_days: i64,

    /// Metadata cache location
    pub cache_path: PathBuf,

    /// Discovery-date cache location
    pub discovery_path: PathBuf,

    /// Source names in query order; unknown names are skipped with a warning
    pub source_priority: Vec<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_cached: false,
            title_similarity_threshold: 0.7,
            cache_ttl_days: DEFAULT_TTL_DAYS,
            cache_path: PathBuf::from("cache/metadata_cache.json"),
            discovery_path: PathBuf::from("cache/discovery_cache.json"),
            source_priority: vec![
                "crossref".to_string(),
                "semantic_scholar".to_string(),
                "openalex".to_string(),
                "arxiv".to_string(),
            ],
        }
    }
}

/// Per-source API settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub crossref: SourceSettings,
    pub semantic_scholar: SourceSettings,
    pub openalex: SourceSettings,
    pub arxiv: SourceSettings,
}

/// Settings shared by every source integration.
///
/// Unset fields resolve to per-source defaults at client construction,
/// so a bare `[sources.crossref]` section behaves identically to no
/// section at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Whether this source participates in enrichment
    pub enabled: bool,

    /// Override the API base URL (mirrors, proxies)
    pub base_url: Option<String>,

    /// Seconds between consecutive requests to this source
    pub rate_limit_secs: Option<f64>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Retry attempts after the first failed request
    pub max_retries: Option<u32>,

    /// Base delay for exponential backoff between retries, in seconds
    pub backoff_base_secs: Option<u64>,

    /// Contact email for APIs that reward identifying yourself
    pub mailto: Option<String>,

    /// API key, for sources that accept one
    pub api_key: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            rate_limit_secs: None,
            timeout_secs: None,
            max_retries: None,
            backoff_base_secs: None,
            mailto: None,
            api_key: None,
        }
    }
}

impl SourceSettings {
    /// Pacing interval, falling back to the source's documented default.
    pub fn rate_limit_or(&self, default_secs: f64) -> Duration {
        Duration::from_secs_f64(self.rate_limit_secs.unwrap_or(default_secs))
    }

    /// Request timeout, falling back to the source's default.
    pub fn timeout_or(&self, default_secs: u64) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(default_secs))
    }

    /// Retry policy from the configured overrides.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy::new(
            self.max_retries.unwrap_or(defaults.max_retries),
            self.backoff_base_secs
                .map_or(defaults.backoff_base, Duration::from_secs),
        )
    }
}

/// Value of `var` when set and non-empty, else the configured value.
pub fn env_or(var: &str, configured: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| configured.map(str::to_string))
}

// ============================================================================
// Config file I/O
// ============================================================================

/// Per-user config directory for this application.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bib-enrich"))
}

/// Full path of the config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Read the configuration, or fall back to defaults.
///
/// A missing or unparseable file is logged and replaced by defaults;
/// enrichment must be able to start with no config at all.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("no usable config directory, using defaults");
        return Config::default();
    };

    load_from(&path)
}

/// Like [`load`], from an explicit path.
pub fn load_from(path: &std::path::Path) -> Config {
    if !path.exists() {
        tracing::info!("no config file at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("config file {:?} is not valid TOML: {}", path, e);
                tracing::warn!("continuing with defaults");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("could not read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Write the configuration to its standard location, creating the
/// directory when needed. Returns the path written.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Temp file then rename; a crash mid-write must not truncate the config
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("saved config to {:?}", path);
    Ok(path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to replace {1} with temp file {0}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
