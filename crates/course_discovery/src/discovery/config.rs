/// Configuration for the course backend client and discovery view
use super::error::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Courses shown per page in the discovery grid.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Configuration for the discovery client.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Base URL of the course REST API
    pub base_url: String,
    /// Courses per page (always >= 1)
    pub page_size: usize,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Bearer token forwarded to the backend, if the session has one
    pub auth_token: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("course_discovery/", env!("CARGO_PKG_VERSION")).to_string(),
            auth_token: None,
        }
    }
}

/// On-disk form of [`DiscoveryConfig`]; every field is optional
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub auth_token: Option<String>,
}

impl DiscoveryConfig {
    /// Builds a config from `COURSE_API_URL`, `COURSE_PAGE_SIZE`,
    /// `COURSE_API_TIMEOUT_SECS` and `COURSE_API_TOKEN`.
    ///
    /// # Returns
    /// * `Ok(DiscoveryConfig)` - Defaults overlaid with whatever is set
    /// * `Err(DiscoveryError::Config)` - If a set variable cannot be parsed
    pub fn from_env() -> Result<Self, DiscoveryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DiscoveryConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DiscoveryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup("COURSE_API_URL") {
            Some(url) => config.base_url = url,
            None => info!("COURSE_API_URL not set, using default: {}", DEFAULT_BASE_URL),
        }

        if let Some(size) = parse_var::<usize>(&lookup, "COURSE_PAGE_SIZE")? {
            config.page_size = size;
        }

        if let Some(secs) = parse_var::<u64>(&lookup, "COURSE_API_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        config.auth_token = lookup("COURSE_API_TOKEN").filter(|t| !t.is_empty());

        config.validated()
    }

    /// Loads a JSON config file, falling back to defaults for missing fields.
    pub fn load_from_file(path: &Path) -> Result<Self, DiscoveryError> {
        let content = fs::read_to_string(path).map_err(|e| DiscoveryError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| DiscoveryError::Config {
            message: format!("invalid config {}: {}", path.display(), e),
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_file(file)
    }

    /// Overlays a parsed config file onto the defaults.
    pub fn from_file(file: ConfigFile) -> Result<Self, DiscoveryError> {
        let defaults = Self::default();
        Self {
            base_url: file.base_url.unwrap_or(defaults.base_url),
            page_size: file.page_size.unwrap_or(defaults.page_size),
            connect_timeout: file
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            auth_token: file.auth_token,
        }
        .validated()
    }

    /// Checks the base URL and replaces a zero page size with the default.
    fn validated(mut self) -> Result<Self, DiscoveryError> {
        url::Url::parse(&self.base_url).map_err(|e| DiscoveryError::Config {
            message: format!("invalid base url {:?}: {}", self.base_url, e),
        })?;

        if self.page_size == 0 {
            info!("Page size 0 is not usable, using default: {}", DEFAULT_PAGE_SIZE);
            self.page_size = DEFAULT_PAGE_SIZE;
        }

        Ok(self)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, DiscoveryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DiscoveryError::Config {
                message: format!("invalid {key} value {raw:?}: {e}"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = DiscoveryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = DiscoveryConfig::from_lookup(lookup_from(&[
            ("COURSE_API_URL", "https://api.example.com/v1/"),
            ("COURSE_PAGE_SIZE", "12"),
            ("COURSE_API_TIMEOUT_SECS", "5"),
            ("COURSE_API_TOKEN", "abc"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v1/");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_malformed_env_is_config_error() {
        let result = DiscoveryConfig::from_lookup(lookup_from(&[("COURSE_PAGE_SIZE", "six")]));
        assert!(matches!(result, Err(DiscoveryError::Config { .. })));

        let result = DiscoveryConfig::from_lookup(lookup_from(&[("COURSE_API_URL", "not a url")]));
        assert!(matches!(result, Err(DiscoveryError::Config { .. })));
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config =
            DiscoveryConfig::from_lookup(lookup_from(&[("COURSE_PAGE_SIZE", "0")])).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_partial_config_file() {
        let json = r#"{"base_url": "http://10.0.0.2:5000", "page_size": 9}"#;
        let file: ConfigFile = serde_json::from_str(json).unwrap();
        let config = DiscoveryConfig::from_file(file).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.page_size, 9);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"{{"base_url": "https://courses.example.com/api", "request_timeout_secs": 4}}"#
        )
        .unwrap();

        let config = DiscoveryConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://courses.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_load_from_bad_file_is_config_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "page_size = 3").unwrap();
        let result = DiscoveryConfig::load_from_file(file.path());
        assert!(matches!(result, Err(DiscoveryError::Config { .. })));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let result = DiscoveryConfig::load_from_file(&missing);
        assert!(matches!(result, Err(DiscoveryError::Config { .. })));
    }
}
