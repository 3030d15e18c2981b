//! Implementation of the `gerrit-cl upload` command.
//!
//! Pushes the changes on `HEAD` to the review server's per-developer
//! endpoint in a single push. Every confirmation happens before the first
//! mutation, so declining any of them leaves the repository untouched.
//! With `--dry-run` the push (and the upstream fix-up) is only printed.

mod directives;


pub use directives::{push_directives, push_refspec};

use super::Session;
use crate::branch_status::list_changes;
use crate::cli::UploadArgs;
use crate::config::Config;
use crate::error::{ClError, Result};
use std::io::Write;
use tracing::info;

/// Split `remote/branch` at the first `/`.
///
/// A local upstream (`branch.<name>.remote = .`) has no slash and reports
/// the remote as `.`.
pub(crate) fn split_upstream(upstream: &str) -> (&str, &str) {
    upstream.split_once('/').unwrap_or((".", upstream))
}

fn is_canonical_upstream(config: &Config, upstream: &str) -> bool {
    split_upstream(upstream) == (config.remote.as_str(), config.main_branch.as_str())
}

/// Execute the `gerrit-cl upload` command.
pub fn cmd_upload(session: &mut Session<'_>, args: &UploadArgs) -> Result<()> {
    let vcs = session.vcs;
    let config = session.config;
    let canonical = config.upstream_ref();

    // A missing upstream is only recorded here and set right before the push.
    let (upstream, set_upstream) = match vcs.upstream_of("HEAD")? {
        Some(upstream) => (upstream, false),
        None => {
            let question = format!("Your branch is not tracking {}. Set it up?", canonical);
            if !session.prompt.confirm(&question)? {
                return Err(ClError::UserError(format!(
                    "Cannot upload without an upstream branch.\n\n\
                     Set one with:\n  git branch --set-upstream-to {}",
                    canonical
                )));
            }
            (canonical.clone(), true)
        }
    };

    let changes = list_changes(vcs, &upstream, "HEAD")?;
    if changes.is_empty() {
        writeln!(session.out, "No changes to upload")?;
        return Ok(());
    }

    writeln!(session.out, "Uploading to {}:", upstream)?;
    for change in &changes {
        writeln!(session.out, "  {} {}", change.sha, change.title)?;
    }
    writeln!(session.out)?;

    if changes.len() > 1 {
        let question = format!("Uploading {} changes, continue?", changes.len());
        if !session.prompt.confirm(&question)? {
            writeln!(session.out, "Upload cancelled.")?;
            return Ok(());
        }
    }

    if !is_canonical_upstream(config, &upstream) {
        writeln!(
            session.out,
            "WARNING: Your branch is tracking {} instead of {}.\n\
             Changes not based on {} may fail review validation.",
            upstream, canonical, canonical
        )?;
        if !session.prompt.confirm("Upload anyway?")? {
            writeln!(session.out, "Upload cancelled.")?;
            return Ok(());
        }
    }

    let refspec = push_refspec(&config.main_branch, &push_directives(args));
    if args.dry_run {
        if set_upstream {
            writeln!(session.out, "Would run: git branch --set-upstream-to {}", canonical)?;
        }
        let command = shell_words::join(["git", "push", config.remote.as_str(), refspec.as_str()]);
        writeln!(session.out, "Would run: {}", command)?;
        return Ok(());
    }

    if set_upstream {
        vcs.set_upstream(&canonical)?;
    }
    vcs.push(&config.remote, &refspec)?;
    info!(remote = %config.remote, refspec = %refspec, count = changes.len(), "uploaded");
    writeln!(session.out, "Uploaded {} change(s).", changes.len())?;
    Ok(())
}
