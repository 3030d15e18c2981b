//! Implementation of the `gerrit-cl prune` command.
//!
//! A branch is obsolete when it is not checked out, tracks an upstream, and
//! every change on it is merged or abandoned on the review server. A
//! tracked branch without changes is obsolete too.
//!
//! "Merged" is decided by review status, not by local ancestry, so
//! deletion is forced.

use super::Session;
use super::status::write_branch_summary;
use crate::branch_status::BranchStatus;
use crate::change::Resolver;
use crate::cli::PruneArgs;
use crate::error::Result;
use std::io::Write;
use tracing::{debug, info};

/// Execute the `gerrit-cl prune` command.
///
/// Lists the obsolete branches and, after confirmation (skipped with
/// `--force`), deletes them all at once.
pub fn cmd_prune(session: &mut Session<'_>, args: &PruneArgs) -> Result<()> {
    let resolver = session.resolver();
    let current = session.vcs.current_branch()?;

    let mut candidates = Vec::new();
    for branch in session.vcs.list_branches()? {
        let mut status = BranchStatus::collect(session.vcs, &branch)?;
        if is_prune_candidate(&mut status, current.as_deref(), &resolver)? {
            candidates.push(status);
        } else {
            debug!(branch = %branch, "keeping branch");
        }
    }

    if candidates.is_empty() {
        writeln!(session.out, "No obsolete branches to delete.")?;
        return Ok(());
    }

    writeln!(session.out, "Obsolete branches:")?;
    writeln!(session.out)?;
    for candidate in &mut candidates {
        write_branch_summary(&mut *session.out, &resolver, candidate)?;
    }

    if !args.force
        && !session
            .prompt
            .confirm("Do you want to delete the above branches?")?
    {
        writeln!(session.out, "No branches deleted.")?;
        return Ok(());
    }

    let names: Vec<String> = candidates.into_iter().map(|c| c.name).collect();
    session.vcs.delete_branches(&names)?;
    info!(count = names.len(), "deleted obsolete branches");
    writeln!(session.out, "Deleted {} branch(es): {}", names.len(), names.join(", "))?;
    Ok(())
}

/// Decide whether `status` may be deleted.
pub(crate) fn is_prune_candidate(
    status: &mut BranchStatus,
    current_branch: Option<&str>,
    resolver: &Resolver<'_>,
) -> Result<bool> {
    if current_branch == Some(status.name.as_str()) || !status.is_tracked() {
        return Ok(false);
    }
    status.all_changes_terminal(resolver)
}
