//! Local changes and their resolution against the review server.
//!
//! A [`LocalChange`] is one commit on a branch. Its Change-Id trailer and
//! its remote review state are each looked up at most once per value: the
//! first call stores the answer in an explicit `Option` field and every
//! later call returns the stored answer.

use crate::error::{ClError, Result};
use crate::review::{ChangeStatus, RemoteChange, ReviewClient};
use crate::vcs::{CommitSummary, Vcs};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// `Change-Id: I<hex>` on a line of its own. Case-sensitive key.
static CHANGE_ID_TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Change-Id: (I[0-9a-f]+)").expect("Invalid Change-Id regex")
});

/// Extract the Change-Id from a full commit message.
///
/// If several lines match, the first one wins.
pub fn extract_change_id(message: &str) -> Option<String> {
    CHANGE_ID_TRAILER
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Outcome of looking a change up on the review server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    remote: Option<RemoteChange>,
}

impl Resolution {
    fn not_uploaded() -> Self {
        Self { remote: None }
    }

    /// Effective status: the remote status, or `NOT_UPLOADED` without a match.
    pub fn status(&self) -> ChangeStatus {
        self.remote
            .as_ref()
            .map(|r| r.status.clone())
            .unwrap_or(ChangeStatus::NotUploaded)
    }

    /// The matching remote change, if there is exactly one.
    pub fn remote(&self) -> Option<&RemoteChange> {
        self.remote.as_ref()
    }
}

/// Everything needed to resolve changes: both adapters and the project scope.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    vcs: &'a dyn Vcs,
    review: &'a dyn ReviewClient,
    project: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(vcs: &'a dyn Vcs, review: &'a dyn ReviewClient, project: &'a str) -> Self {
        Self {
            vcs,
            review,
            project,
        }
    }
}

/// One commit between a branch's upstream and its tip.
#[derive(Debug, Clone)]
pub struct LocalChange {
    pub sha: String,
    pub title: String,
    /// Outer `None`: not looked up yet. `Some(None)`: commit has no trailer.
    change_id: Option<Option<String>>,
    resolution: Option<Resolution>,
}

impl LocalChange {
    pub fn new(commit: CommitSummary) -> Self {
        Self {
            sha: commit.sha,
            title: commit.title,
            change_id: None,
            resolution: None,
        }
    }

    /// The commit's Change-Id, read from its message on first use.
    pub fn change_id(&mut self, vcs: &dyn Vcs) -> Result<Option<&str>> {
        let id = match self.change_id.take() {
            Some(id) => id,
            None => extract_change_id(&vcs.commit_message(&self.sha)?),
        };
        Ok(self.change_id.insert(id).as_deref())
    }

    /// Resolve this change against the review server.
    ///
    /// Commits without a Change-Id resolve to `NOT_UPLOADED` without a
    /// query. More than one remote match is a [`ClError::ReviewLookupConflict`].
    /// A successful resolution is cached; a failed one is not.
    pub fn resolve(&mut self, resolver: &Resolver<'_>) -> Result<&Resolution> {
        let resolution = match self.resolution.take() {
            Some(cached) => {
                trace!(sha = %self.sha, "resolution cache hit");
                cached
            }
            None => self.lookup(resolver)?,
        };
        Ok(self.resolution.insert(resolution))
    }

    /// The cached resolution, if [`LocalChange::resolve`] has already run.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn lookup(&mut self, resolver: &Resolver<'_>) -> Result<Resolution> {
        let Some(change_id) = self.change_id(resolver.vcs)?.map(str::to_string) else {
            return Ok(Resolution::not_uploaded());
        };

        let mut matches = resolver.review.query_changes(resolver.project, &change_id)?;
        if matches.len() > 1 {
            return Err(ClError::ReviewLookupConflict {
                sha: self.sha.clone(),
                title: self.title.clone(),
            });
        }
        let remote = matches.pop();
        if let Some(found) = &remote {
            debug!(sha = %self.sha, number = found.number, status = %found.status, "resolved change");
        }
        Ok(Resolution { remote })
    }
}
