//! Pre-flight checks run before every command.
//!
//! Makes sure the configured remote points at the review project and that
//! the review server's commit-msg hook is installed. Both checks only
//! mutate the repository when something is actually missing or wrong.

use crate::commands::Session;
use crate::config::Config;
use crate::error::{ClError, Result};
use crate::fs::atomic_write;
use crate::prompt::Confirm;
use crate::review::ReviewClient;
use crate::vcs::Vcs;
use std::io::Write;
use std::path::Path;
use tracing::info;

const HOOK_MODE: u32 = 0o755;

/// What [`ensure_remote`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCheck {
    AlreadyCorrect,
    Added,
    Fixed,
}

/// What [`ensure_commit_msg_hook`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCheck {
    AlreadyInstalled,
    Installed,
    MadeExecutable,
}

/// Ensure `config.remote` exists and points at an accepted project URL.
///
/// Declining to add or fix the remote is a configuration error.
pub fn ensure_remote(
    vcs: &dyn Vcs,
    config: &Config,
    prompt: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<RemoteCheck> {
    let remote = &config.remote;
    match vcs.remote_url(remote)? {
        Some(url) if config.is_accepted_remote_url(&url) => Ok(RemoteCheck::AlreadyCorrect),
        Some(url) => {
            writeln!(out, "Your remote '{}' points to the wrong URL:", remote)?;
            writeln!(out, "  actual:   {}", url)?;
            writeln!(out, "  expected: {}", config.remote_url)?;
            if !prompt.confirm(&format!("Set '{}' to {}?", remote, config.remote_url))? {
                return Err(ClError::ConfigError(format!(
                    "remote '{}' must point at {}",
                    remote, config.remote_url
                )));
            }
            vcs.set_remote_url(remote, &config.remote_url)?;
            info!(remote = %remote, url = %config.remote_url, "remote URL fixed");
            Ok(RemoteCheck::Fixed)
        }
        None => {
            let question = format!("Remote '{}' is missing. Add it as {}?", remote, config.remote_url);
            if !prompt.confirm(&question)? {
                return Err(ClError::ConfigError(format!(
                    "remote '{}' is required; add it with:\n  git remote add {} {}",
                    remote, remote, config.remote_url
                )));
            }
            vcs.add_remote(remote, &config.remote_url)?;
            info!(remote = %remote, url = %config.remote_url, "remote added");
            Ok(RemoteCheck::Added)
        }
    }
}

/// Ensure the commit-msg hook at `hook_path` exists and is executable.
pub fn ensure_commit_msg_hook(
    hook_path: &Path,
    review: &dyn ReviewClient,
    out: &mut dyn Write,
) -> Result<HookCheck> {
    if hook_path.exists() {
        if is_executable(hook_path)? {
            return Ok(HookCheck::AlreadyInstalled);
        }
        make_executable(hook_path)?;
        info!(path = %hook_path.display(), "commit-msg hook made executable");
        return Ok(HookCheck::MadeExecutable);
    }

    writeln!(out, "Installing commit-msg hook to {}", hook_path.display())?;
    let contents = review.fetch_commit_msg_hook()?;
    atomic_write(hook_path, &contents, Some(HOOK_MODE))?;
    info!(path = %hook_path.display(), "commit-msg hook installed");
    Ok(HookCheck::Installed)
}

/// Run both checks with the session's capabilities.
pub fn run(session: &mut Session<'_>, hook_path: &Path) -> Result<()> {
    ensure_remote(session.vcs, session.config, &mut *session.prompt, &mut *session.out)?;
    ensure_commit_msg_hook(hook_path, session.review, &mut *session.out)?;
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::metadata(path)?.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> Result<bool> {
    Ok(true)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(HOOK_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
