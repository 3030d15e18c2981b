//! Version-control adapter.
//!
//! Commands never spawn git directly; they talk to a [`Vcs`] so that tests
//! can substitute an in-memory repository. [`GitCli`] is the real
//! implementation backed by the `git` binary.

mod git_cli;


pub use git_cli::GitCli;

use crate::error::Result;

/// One commit on a branch's first-parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Full commit hash.
    pub sha: String,
    /// First line of the commit message.
    pub title: String,
}

impl CommitSummary {
    pub fn new(sha: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            title: title.into(),
        }
    }
}

/// How a cherry-pick of a commit range ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickOutcome {
    /// Every commit applied cleanly.
    Applied,
    /// The pick stopped on a conflict; the repository is left mid-cherry-pick.
    Conflicted { message: String },
}

/// Operations the tool issues against the local repository.
///
/// `"HEAD"` is accepted wherever a branch or ref name is expected.
pub trait Vcs {
    /// Short names of all local branches (`refs/heads/*`).
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Tracking ref of `branch` (e.g. `origin/main`), or `None` if untracked.
    fn upstream_of(&self, branch: &str) -> Result<Option<String>>;

    /// Commits reachable from `tip` but not from `base`, following first
    /// parents only, newest first.
    fn first_parent_range(&self, base: &str, tip: &str) -> Result<Vec<CommitSummary>>;

    /// Whether `base..tip` contains any merge commit.
    fn has_merges(&self, base: &str, tip: &str) -> Result<bool>;

    /// Full commit message of `sha`.
    fn commit_message(&self, sha: &str) -> Result<String>;

    /// Name of the checked-out branch, `None` on a detached HEAD.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Whether a local branch called `branch` exists.
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// One-line description (`<short sha> <title>`) of the commit `refname` points at.
    fn describe_tip(&self, refname: &str) -> Result<String>;

    /// Force-delete the given local branches.
    fn delete_branches(&self, branches: &[String]) -> Result<()>;

    /// Fetch `branch` from `remote`.
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create or reset `branch` to `start` and check it out.
    fn reset_branch(&self, branch: &str, start: &str) -> Result<()>;

    /// Cherry-pick `base..tip` onto the current HEAD.
    fn cherry_pick_range(&self, base: &str, tip: &str) -> Result<CherryPickOutcome>;

    /// Make the current branch track `upstream`.
    fn set_upstream(&self, upstream: &str) -> Result<()>;

    /// Push `refspec` to `remote`.
    fn push(&self, remote: &str, refspec: &str) -> Result<()>;

    /// Fetch URL of `remote`, `None` if no such remote exists.
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Point an existing remote at `url`.
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;

    /// Add a new remote.
    fn add_remote(&self, remote: &str, url: &str) -> Result<()>;
}
