//! Implementation of the `gerrit-cl rebase` command.
//!
//! Replays the current branch onto a freshly fetched upstream in a sibling
//! branch named `<current><rebase_suffix>`. An existing branch of that name
//! is overwritten and its old tip is not kept anywhere.
//!
//! Only linear branches are supported: `git cherry-pick` cannot replay a
//! merge commit without `-m`, so branches with merges are refused before
//! anything is touched.

use super::Session;
use crate::error::{ClError, Result};
use crate::vcs::CherryPickOutcome;
use std::io::Write;
use tracing::info;

/// Name of the branch `rebase` writes to.
pub(crate) fn rebase_branch_name(branch: &str, suffix: &str) -> String {
    format!("{}{}", branch, suffix)
}

/// Execute the `gerrit-cl rebase` command.
///
/// Cherry-pick conflicts are left in place for the operator to continue or
/// abort; they are reported, not treated as a failure.
pub fn cmd_rebase(session: &mut Session<'_>) -> Result<()> {
    let vcs = session.vcs;
    let config = session.config;

    let current = vcs.current_branch()?.ok_or_else(|| {
        ClError::UserError(
            "HEAD is detached; check out the branch you want to rebase first.".to_string(),
        )
    })?;
    let upstream = vcs.upstream_of(&current)?.ok_or_else(|| {
        ClError::UserError(format!(
            "Branch {} is not tracking an upstream branch.\n\n\
             Set one with:\n  git branch --set-upstream-to {}",
            current,
            config.upstream_ref()
        ))
    })?;

    if vcs.has_merges(&upstream, &current)? {
        return Err(ClError::UserError(format!(
            "Branch {} contains merge commits on top of {}; only linear branches can be rebased.",
            current, upstream
        )));
    }

    let target = rebase_branch_name(&current, &config.rebase_suffix);
    if vcs.branch_exists(&target)? {
        writeln!(
            session.out,
            "Overwriting existing branch {} (its current tip will be lost):",
            target
        )?;
        writeln!(session.out, "   {}", vcs.describe_tip(&target)?)?;
    }

    vcs.fetch(&config.remote, &config.main_branch)?;
    vcs.reset_branch(&target, &config.upstream_ref())?;

    let commits = vcs.first_parent_range(&upstream, &current)?;
    if commits.is_empty() {
        writeln!(
            session.out,
            "Branch {} has no changes on top of {}; {} now matches {}.",
            current,
            upstream,
            target,
            config.upstream_ref()
        )?;
        return Ok(());
    }

    writeln!(
        session.out,
        "Cherry-picking {} change(s) from {}",
        commits.len(),
        current
    )?;
    match vcs.cherry_pick_range(&upstream, &current)? {
        CherryPickOutcome::Applied => {
            info!(branch = %target, count = commits.len(), "rebased");
            writeln!(
                session.out,
                "Rebased {} onto {} as {}.",
                current,
                config.upstream_ref(),
                target
            )?;
        }
        CherryPickOutcome::Conflicted { message } => {
            writeln!(session.out, "{}", message)?;
            writeln!(session.out)?;
            writeln!(
                session.out,
                "Cherry-pick stopped on a conflict in {}. Resolve it, then run\n  \
                 git cherry-pick --continue\n\
                 or give up with\n  \
                 git cherry-pick --abort",
                target
            )?;
        }
    }
    Ok(())
}
