//! Configuration for academia-orcid
//!
//! Loaded once at startup from a TOML file (optional), then overridden by
//! environment variables. Every section defaults independently, so a file
//! only needs the keys it changes:
//!
//! ```toml
//! [api]
//! max_concurrent_requests = 3
//!
//! [cache]
//! ttl_seconds = 86400
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Name of the per-user and per-directory config file
pub const CONFIG_FILE_NAME: &str = ".academia-orcid.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ORCID API and doi.org settings
    pub api: ApiConfig,
    /// Local record cache
    pub cache: CacheConfig,
    /// Rendering options
    pub output: OutputConfig,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// ORCID public API root, without trailing slash
    pub base_url: String,
    /// Timeout for the main record request
    pub timeout_secs: u64,
    /// Timeout for each work-detail request
    pub work_detail_timeout_secs: u64,
    /// Attempts per work detail before giving up
    pub max_retries: u32,
    /// Pause between batches of work-detail requests (and between DOI lookups)
    pub rate_limit_delay_secs: f64,
    /// First backoff delay after a 429 or transport error; doubles per retry
    pub rate_limit_backoff_secs: f64,
    /// Work-detail requests in flight at once
    pub max_concurrent_requests: usize,
    /// DOI resolver used for content negotiation
    pub doi_base_url: String,
    /// Timeout for each DOI lookup
    pub doi_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pub.orcid.org/v3.0".to_string(),
            timeout_secs: 60,
            work_detail_timeout_secs: 30,
            max_retries: 3,
            rate_limit_delay_secs: 0.3,
            rate_limit_backoff_secs: 0.5,
            max_concurrent_requests: 5,
            doi_base_url: "https://doi.org".to_string(),
            doi_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn work_detail_timeout(&self) -> Duration {
        Duration::from_secs(self.work_detail_timeout_secs)
    }

    pub fn doi_timeout(&self) -> Duration {
        Duration::from_secs(self.doi_timeout_secs)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        seconds(self.rate_limit_delay_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        seconds(self.rate_limit_backoff_secs)
    }
}

/// Negative or NaN values from a config file become zero
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Record cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Age after which a cached record is refetched
    pub ttl_seconds: u64,
    /// Cache directory name under the data directory
    pub dir_name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 7 * 24 * 60 * 60,
            dir_name: "ORCID_JSON".to_string(),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Authors shown before "et al."
    pub author_limit: usize,
    /// Indentation of JSON output
    pub json_indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            author_limit: 5,
            json_indent: 2,
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.validate();
        Ok(config)
    }

    /// Default locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }
        paths.push(PathBuf::from("/etc/academia-orcid/config.toml"));
        paths
    }

    /// Build the effective configuration.
    ///
    /// Uses `explicit` when given, else the first existing file from
    /// [`Config::search_paths`]. A missing, unreadable or malformed file
    /// falls back to defaults with a warning. Environment overrides are
    /// applied last.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::search_paths().into_iter().find(|p| p.exists()),
        };

        let mut config = match path {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Some(path) => {
                warn!("Config file not found: {}", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        debug!(?config, "Effective configuration");
        config
    }

    /// Replace unsafe values with their defaults
    pub fn validate(&mut self) {
        if !self.api.base_url.starts_with("https://") {
            warn!(
                "Rejecting api.base_url {:?}: must use https://",
                self.api.base_url
            );
            self.api.base_url = ApiConfig::default().base_url;
        }

        let dir_name = &self.cache.dir_name;
        if dir_name.contains('/') || dir_name.contains('\\') || dir_name.contains("..") {
            warn!("Rejecting cache.dir_name {:?}: must be a plain name", dir_name);
            self.cache.dir_name = CacheConfig::default().dir_name;
        }
    }

    /// Apply `ORCID_API_BASE_URL`, `ORCID_CACHE_TTL` and `ORCID_API_TIMEOUT`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; unparsable numbers are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("ORCID_API_BASE_URL").filter(|v| !v.is_empty()) {
            self.api.base_url = base_url;
        }

        if let Some(ttl) = lookup("ORCID_CACHE_TTL").and_then(|v| v.trim().parse().ok()) {
            self.cache.ttl_seconds = ttl;
        }

        if let Some(timeout) = lookup("ORCID_API_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.api.timeout_secs = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://pub.orcid.org/v3.0");
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.max_concurrent_requests, 5);
        assert_eq!(config.cache.ttl_seconds, 604_800);
        assert_eq!(config.cache.dir_name, "ORCID_JSON");
        assert_eq!(config.output.author_limit, 5);
        assert_eq!(config.output.json_indent, 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            max_concurrent_requests = 2

            [output]
            json_indent = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.api.max_concurrent_requests, 2);
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.output.json_indent, 4);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Config::from_toml("[api\nbase_url = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_plain_http() {
        let mut config = Config::default();
        config.api.base_url = "http://pub.orcid.org/v3.0".to_string();
        config.validate();
        assert_eq!(config.api.base_url, "https://pub.orcid.org/v3.0");
    }

    #[rstest]
    #[case("../elsewhere")]
    #[case("a/b")]
    #[case(r"a\b")]
    #[case("..")]
    fn test_validate_rejects_path_like_dir_name(#[case] dir_name: &str) {
        let mut config = Config::default();
        config.cache.dir_name = dir_name.to_string();
        config.validate();
        assert_eq!(config.cache.dir_name, "ORCID_JSON");
    }

    #[test]
    fn test_validate_keeps_plain_dir_name() {
        let mut config = Config::default();
        config.cache.dir_name = "orcid_cache".to_string();
        config.validate();
        assert_eq!(config.cache.dir_name, "orcid_cache");
    }

    #[test]
    fn test_from_file_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://evil.example\"\n\n[cache]\nttl_seconds = 60\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "https://pub.orcid.org/v3.0");
        assert_eq!(config.cache.ttl_seconds, 60);
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let mut expected = Config::default();
        expected.apply_env_overrides();
        assert_eq!(Config::load(Some(&path)), expected);
        assert_eq!(Config::load(Some(&dir.path().join("missing.toml"))), expected);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ORCID_API_BASE_URL", "https://sandbox.orcid.org/v3.0"),
            ("ORCID_CACHE_TTL", "3600"),
            ("ORCID_API_TIMEOUT", "15"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://sandbox.orcid.org/v3.0");
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.api.timeout_secs, 15);
    }

    #[test]
    fn test_env_overrides_ignore_unparsable_numbers() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "ORCID_CACHE_TTL" => Some("a week".to_string()),
            "ORCID_API_TIMEOUT" => Some("-5".to_string()),
            _ => None,
        });

        assert_eq!(config.cache.ttl_seconds, 604_800);
        assert_eq!(config.api.timeout_secs, 60);
    }

    #[test]
    fn test_durations() {
        let api = ApiConfig::default();
        assert_eq!(api.rate_limit_delay(), Duration::from_millis(300));
        assert_eq!(api.rate_limit_backoff(), Duration::from_millis(500));

        let negative = ApiConfig {
            rate_limit_delay_secs: -1.0,
            ..ApiConfig::default()
        };
        assert_eq!(negative.rate_limit_delay(), Duration::ZERO);
    }
}
