//! Repository context resolution for gerrit-cl.
//!
//! Finds the Git repository root and git directory from any working
//! directory and loads the per-repository configuration.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{ClError, Result};
use crate::git;
use std::env;
use std::path::{Path, PathBuf};

/// Resolved paths and configuration for one invocation.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Absolute path to the repository working tree root.
    pub repo_root: PathBuf,

    /// Absolute path to the git directory shared by all worktrees.
    pub git_dir: PathBuf,

    /// Effective configuration.
    pub config: Config,
}

impl RepoContext {
    /// Resolve the context from the current working directory.
    ///
    /// `config_override` replaces the default `<repo_root>/.gerrit-cl.yaml`
    /// location; an explicitly named file must exist.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ClError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd, config_override)
    }

    /// Resolve the context from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, config_override: Option<&Path>) -> Result<Self> {
        let cwd = cwd.as_ref();
        let repo_root = git::get_repo_root(cwd)?;
        let git_dir = git::get_git_dir(&repo_root)?;

        let config = match config_override {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(repo_root.join(CONFIG_FILE_NAME))?,
        };

        Ok(Self {
            repo_root,
            git_dir,
            config,
        })
    }

    /// Path of the Gerrit commit-msg hook.
    pub fn commit_msg_hook_path(&self) -> PathBuf {
        self.git_dir.join("hooks").join("commit-msg")
    }
}
