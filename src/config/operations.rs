//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{ClError, Result};
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ClError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ClError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if the file exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ClError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `remote`, `main_branch`, `project`, `remote_url`, `review_url` must be non-empty
    /// - `rebase_suffix` must be non-empty and contain no whitespace
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("remote", &self.remote),
            ("main_branch", &self.main_branch),
            ("project", &self.project),
            ("remote_url", &self.remote_url),
            ("review_url", &self.review_url),
            ("rebase_suffix", &self.rebase_suffix),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ClError::ConfigError(format!(
                    "config validation failed: {} must not be empty",
                    key
                )));
            }
        }

        if self.rebase_suffix.chars().any(char::is_whitespace) {
            return Err(ClError::ConfigError(format!(
                "config validation failed: rebase_suffix must not contain whitespace (found '{}')",
                self.rebase_suffix
            )));
        }

        Ok(())
    }

    /// The upstream ref every branch is expected to track, e.g. `origin/main`.
    pub fn upstream_ref(&self) -> String {
        format!("{}/{}", self.remote, self.main_branch)
    }

    /// Whether `url` is the canonical remote URL or one of its accepted aliases.
    pub fn is_accepted_remote_url(&self, url: &str) -> bool {
        let url = url.trim_end_matches('/');
        url == self.remote_url.trim_end_matches('/')
            || self
                .alternate_remote_urls
                .iter()
                .any(|alt| url == alt.trim_end_matches('/'))
    }

    /// Short link for a review change number.
    pub fn short_url(&self, number: u64) -> String {
        format!("{}/{}", self.short_url_base.trim_end_matches('/'), number)
    }
}
