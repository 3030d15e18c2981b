//! Per-branch view: upstream plus the local changes on top of it.

use crate::change::{LocalChange, Resolver};
use crate::error::Result;
use crate::vcs::Vcs;

/// A local branch, its tracking ref and its changes, newest first.
#[derive(Debug, Clone)]
pub struct BranchStatus {
    pub name: String,
    /// `None` when the branch tracks nothing; `changes` is then empty.
    pub upstream: Option<String>,
    pub changes: Vec<LocalChange>,
}

/// Local changes in `upstream..tip` along the first-parent chain, newest first.
pub fn list_changes(vcs: &dyn Vcs, upstream: &str, tip: &str) -> Result<Vec<LocalChange>> {
    Ok(vcs
        .first_parent_range(upstream, tip)?
        .into_iter()
        .map(LocalChange::new)
        .collect())
}

impl BranchStatus {
    /// Collect the upstream and change list of `branch`.
    ///
    /// An untracked branch is not an error here; callers decide.
    pub fn collect(vcs: &dyn Vcs, branch: &str) -> Result<Self> {
        let upstream = vcs.upstream_of(branch)?;
        let changes = match &upstream {
            Some(upstream) => list_changes(vcs, upstream, branch)?,
            None => Vec::new(),
        };

        Ok(Self {
            name: branch.to_string(),
            upstream,
            changes,
        })
    }

    pub fn is_tracked(&self) -> bool {
        self.upstream.is_some()
    }

    /// Whether every change has reached a terminal review state.
    ///
    /// Vacuously true for a branch without changes. Stops querying at the
    /// first change that is still active.
    pub fn all_changes_terminal(&mut self, resolver: &Resolver<'_>) -> Result<bool> {
        for change in &mut self.changes {
            if !change.resolve(resolver)?.status().is_terminal() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
