//! [`Vcs`] implementation that shells out to the `git` binary.

use super::{CherryPickOutcome, CommitSummary, Vcs};
use crate::error::{ClError, Result};
use crate::git::{run_git, try_git};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Git adapter bound to one repository.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(repo_root: P) -> Self {
        Self {
            repo_root: repo_root.as_ref().to_path_buf(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<crate::git::GitOutput> {
        run_git(&self.repo_root, args)
    }
}

/// Parse `git log --format='%H %s'` output.
pub(crate) fn parse_commit_lines(stdout: &str) -> Vec<CommitSummary> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(' ') {
            Some((sha, title)) => CommitSummary::new(sha, title),
            None => CommitSummary::new(line, ""),
        })
        .collect()
}

impl Vcs for GitCli {
    fn list_branches(&self) -> Result<Vec<String>> {
        let output = self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads"])?;
        Ok(output.lines().into_iter().map(str::to_string).collect())
    }

    fn upstream_of(&self, branch: &str) -> Result<Option<String>> {
        let spec = format!("{}@{{upstream}}", branch);
        let output = try_git(
            &self.repo_root,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", &spec],
        )?;
        Ok(output.map(|o| o.stdout).filter(|s| !s.is_empty()))
    }

    fn first_parent_range(&self, base: &str, tip: &str) -> Result<Vec<CommitSummary>> {
        let range = format!("{}..{}", base, tip);
        let output = self.git(&["log", "--format=%H %s", "--first-parent", &range])?;
        Ok(parse_commit_lines(&output.stdout))
    }

    fn has_merges(&self, base: &str, tip: &str) -> Result<bool> {
        let range = format!("{}..{}", base, tip);
        let output = self.git(&["rev-list", "--merges", "--max-count=1", &range])?;
        Ok(!output.stdout.is_empty())
    }

    fn commit_message(&self, sha: &str) -> Result<String> {
        let output = self.git(&["log", "-1", "--format=%B", sha])?;
        Ok(output.stdout)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let output = self.git(&["branch", "--show-current"])?;
        Ok(Some(output.stdout).filter(|s| !s.is_empty()))
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        let refname = format!("refs/heads/{}", branch);
        let output = try_git(&self.repo_root, &["rev-parse", "--verify", "--quiet", &refname])?;
        Ok(output.is_some())
    }

    fn describe_tip(&self, refname: &str) -> Result<String> {
        let output = self.git(&["log", "-n1", "--format=%h %s", refname])?;
        Ok(output.stdout)
    }

    fn delete_branches(&self, branches: &[String]) -> Result<()> {
        if branches.is_empty() {
            return Ok(());
        }
        let mut args = vec!["branch", "-D"];
        args.extend(branches.iter().map(String::as_str));
        self.git(&args).map_err(|e| {
            ClError::GitError(format!("failed to delete branches {}: {}", branches.join(", "), e))
        })?;
        Ok(())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.git(&["fetch", "-q", remote, branch]).map_err(|e| {
            ClError::GitError(format!(
                "failed to fetch {}/{}: {}\n\n\
                 Make sure the remote '{}' is accessible and the branch '{}' exists.",
                remote, branch, e, remote, branch
            ))
        })?;
        Ok(())
    }

    fn reset_branch(&self, branch: &str, start: &str) -> Result<()> {
        self.git(&["checkout", "-q", "-B", branch, start]).map_err(|e| {
            ClError::GitError(format!(
                "failed to reset branch '{}' to {}: {}",
                branch, start, e
            ))
        })?;
        Ok(())
    }

    fn cherry_pick_range(&self, base: &str, tip: &str) -> Result<CherryPickOutcome> {
        let range = format!("{}..{}", base, tip);
        match self.git(&["cherry-pick", &range]) {
            Ok(_) => Ok(CherryPickOutcome::Applied),
            Err(err) => {
                let in_progress = try_git(
                    &self.repo_root,
                    &["rev-parse", "--verify", "--quiet", "CHERRY_PICK_HEAD"],
                )?;
                if in_progress.is_some() {
                    warn!(range = %range, "cherry-pick stopped on a conflict");
                    Ok(CherryPickOutcome::Conflicted {
                        message: err.to_string(),
                    })
                } else {
                    Err(err)
                }
            }
        }
    }

    fn set_upstream(&self, upstream: &str) -> Result<()> {
        self.git(&["branch", "--set-upstream-to", upstream])?;
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        debug!(remote, refspec, "pushing");
        self.git(&["push", remote, refspec])?;
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let output = try_git(&self.repo_root, &["remote", "get-url", remote])?;
        Ok(output.map(|o| o.stdout))
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.git(&["remote", "set-url", remote, url])?;
        Ok(())
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        self.git(&["remote", "add", remote, url])?;
        Ok(())
    }
}
