//! Git command runner for gerrit-cl.
//!
//! Provides a wrapper around git commands with captured stdout/stderr
//! and structured error handling. Every git process the tool spawns goes
//! through this module.

use crate::error::{ClError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Result of a git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }

    /// The most useful diagnostic text: stderr, falling back to stdout.
    pub fn message(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

fn spawn_git(cwd: &Path, args: &[&str]) -> Result<Output> {
    debug!(cwd = %cwd.display(), args = ?args, "running git");
    Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            ClError::GitError(format!(
                "failed to execute git {}: {} (is git installed?)",
                args.first().unwrap_or(&""),
                e
            ))
        })
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(ClError::GitError)` - On non-zero exit code (mapped to exit code 3)
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = spawn_git(cwd.as_ref(), args)?;
    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        Err(ClError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            git_output.message()
        )))
    }
}

/// Run a git command whose failure is an expected answer rather than an error.
///
/// Returns `Ok(Some(output))` on success and `Ok(None)` on a non-zero exit.
/// Only a failure to spawn git at all is reported as an error.
pub fn try_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<Option<GitOutput>> {
    let output = spawn_git(cwd.as_ref(), args)?;
    if output.status.success() {
        Ok(Some(GitOutput::from_output(&output)))
    } else {
        debug!(args = ?args, stderr = %String::from_utf8_lossy(&output.stderr).trim(), "git exited non-zero");
        Ok(None)
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(ClError::UserError)` - If not inside a git repository (exit code 1)
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let output = rev_parse_for_repo_detection(cwd.as_ref(), "--show-toplevel")?;
    Ok(PathBuf::from(&output))
}

/// Get the absolute git directory (`.git`, or the common dir of a worktree).
pub fn get_git_dir<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();
    let output = rev_parse_for_repo_detection(cwd, "--git-common-dir")?;
    let path = PathBuf::from(&output);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(cwd.join(path))
    }
}

/// "Not in a git repo" is a clean user error (exit 1), not a git error (exit 3).
fn rev_parse_for_repo_detection(cwd: &Path, flag: &str) -> Result<String> {
    let output = Command::new("git")
        .current_dir(cwd)
        .args(["rev-parse", flag])
        .output()
        .map_err(|e| {
            ClError::UserError(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    let git_output = GitOutput::from_output(&output);
    if output.status.success() {
        return Ok(git_output.stdout);
    }

    if git_output.stderr.contains("not a git repository") {
        Err(ClError::UserError(
            "not inside a git repository. Run this command from within a git repository."
                .to_string(),
        ))
    } else {
        Err(ClError::UserError(format!(
            "git command failed: {}",
            git_output.message()
        )))
    }
}
