//! Implementation of the `gerrit-cl status` command.

use super::Session;
use crate::branch_status::BranchStatus;
use crate::change::Resolver;
use crate::error::Result;
use std::io::Write;

/// Execute the `gerrit-cl status` command.
///
/// Prints every local branch with its upstream and its changes. Read only.
pub fn cmd_status(session: &mut Session<'_>) -> Result<()> {
    let resolver = session.resolver();
    for branch in session.vcs.list_branches()? {
        let mut status = BranchStatus::collect(session.vcs, &branch)?;
        write_branch_summary(&mut *session.out, &resolver, &mut status)?;
    }
    Ok(())
}

/// Write the summary block for one branch, resolving its changes as needed.
///
/// Changes that were already resolved are not queried again.
pub(crate) fn write_branch_summary(
    out: &mut dyn Write,
    resolver: &Resolver<'_>,
    status: &mut BranchStatus,
) -> Result<()> {
    match status.upstream.as_deref() {
        None => {
            writeln!(out, "Branch {} is not tracking an upstream branch", status.name)?;
            writeln!(out)?;
            return Ok(());
        }
        Some(upstream) => writeln!(out, "Branch {} tracking {}", status.name, upstream)?,
    }

    if status.changes.is_empty() {
        writeln!(out, "   No changes")?;
    }
    for change in &mut status.changes {
        let resolution = change.resolve(resolver)?.clone();
        match resolution.remote() {
            Some(remote) => writeln!(
                out,
                "   {} {} ({})",
                remote.status, change.title, remote.short_url
            )?,
            None => writeln!(out, "   {} {}", resolution.status(), change.title)?,
        }
    }
    writeln!(out)?;
    Ok(())
}
