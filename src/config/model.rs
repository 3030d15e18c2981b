//! Config struct definition and defaults.

use serde::{Deserialize, Serialize};

/// File name of the per-repository config, relative to the repository root.
pub const CONFIG_FILE_NAME: &str = ".gerrit-cl.yaml";

/// Configuration for gerrit-cl.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Git settings
    // =========================================================================
    /// Name of the remote that points at the review server (default: "origin").
    pub remote: String,

    /// Name of the integration branch on the remote (default: "main").
    pub main_branch: String,

    /// URL the remote is expected to point at.
    pub remote_url: String,

    /// Other URLs that are accepted as equivalent to `remote_url`.
    pub alternate_remote_urls: Vec<String>,

    /// Suffix appended to the current branch name by `rebase`.
    pub rebase_suffix: String,

    // =========================================================================
    // Review server settings
    // =========================================================================
    /// Base URL of the Gerrit server used for change queries.
    pub review_url: String,

    /// Gerrit project that changes are looked up in.
    pub project: String,

    /// Where the commit-msg hook is downloaded from.
    pub hook_url: String,

    /// Prefix for short change links; the change number is appended.
    pub short_url_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            main_branch: "main".to_string(),
            remote_url: "https://chromium-review.googlesource.com/crosvm/crosvm".to_string(),
            alternate_remote_urls: vec!["sso://chromium/crosvm/crosvm".to_string()],
            rebase_suffix: "-rebase".to_string(),
            review_url: "https://chromium-review.googlesource.com".to_string(),
            project: "crosvm/crosvm".to_string(),
            hook_url: "https://gerrit-review.googlesource.com/tools/hooks/commit-msg".to_string(),
            short_url_base: "http://crrev.com/c".to_string(),
        }
    }
}
