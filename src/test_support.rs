use crate::commands::Session;
use crate::config::Config;
use crate::error::{ClError, Result};
use crate::prompt::Confirm;
use crate::review::{ChangeStatus, RemoteChange, ReviewClient};
use crate::vcs::{CherryPickOutcome, CommitSummary, Vcs};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The process cwd is global; lock it even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

// ============================================================================
// Real repositories
// ============================================================================

pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// A repo whose `origin` remote points at itself, fetched so that
/// `origin/main` exists.
pub(crate) fn create_test_repo_with_origin() -> TempDir {
    let temp_dir = create_test_repo();
    let path = temp_dir.path();
    let path_str = path.to_string_lossy().to_string();
    git(path, &["remote", "add", "origin", &path_str]);
    git(path, &["fetch", "-q", "origin"]);
    temp_dir
}

/// Commit a new file and return the commit hash.
pub(crate) fn commit_file(repo_dir: &Path, file: &str, message: &str) -> String {
    std::fs::write(repo_dir.join(file), format!("{}\n", file)).unwrap();
    git(repo_dir, &["add", file]);
    git(repo_dir, &["commit", "-q", "-m", message]);
    git(repo_dir, &["rev-parse", "HEAD"])
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

// ============================================================================
// In-memory VCS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBranch {
    pub upstream: Option<String>,
    /// Newest first.
    pub commits: Vec<CommitSummary>,
}

#[derive(Debug, Default)]
struct FakeState {
    branches: BTreeMap<String, FakeBranch>,
    messages: HashMap<String, String>,
    current: Option<String>,
    remotes: BTreeMap<String, String>,
    conflict_on_pick: bool,
    merge_branches: BTreeSet<String>,
    mutations: Vec<String>,
}

/// A [`Vcs`] over an in-memory set of branches.
///
/// `first_parent_range` ignores its base and returns the tip branch's
/// commits. Every mutating call is recorded in `mutations()`.
#[derive(Debug, Default)]
pub(crate) struct FakeVcs {
    state: RefCell<FakeState>,
    message_reads: Cell<usize>,
}

impl FakeVcs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a branch with `(sha, title, full message)` commits, newest first.
    pub(crate) fn with_branch(
        self,
        name: &str,
        upstream: Option<&str>,
        commits: &[(&str, &str, &str)],
    ) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for (sha, _, message) in commits {
                state.messages.insert(sha.to_string(), message.to_string());
            }
            state.branches.insert(
                name.to_string(),
                FakeBranch {
                    upstream: upstream.map(str::to_string),
                    commits: commits
                        .iter()
                        .map(|(sha, title, _)| CommitSummary::new(*sha, *title))
                        .collect(),
                },
            );
        }
        self
    }

    pub(crate) fn checked_out(self, name: &str) -> Self {
        self.state.borrow_mut().current = Some(name.to_string());
        self
    }

    pub(crate) fn with_remote(self, name: &str, url: &str) -> Self {
        self.state
            .borrow_mut()
            .remotes
            .insert(name.to_string(), url.to_string());
        self
    }

    /// Mark `name` as containing a merge commit.
    pub(crate) fn with_merges(self, name: &str) -> Self {
        self.state.borrow_mut().merge_branches.insert(name.to_string());
        self
    }

    pub(crate) fn conflicting_cherry_pick(self) -> Self {
        self.state.borrow_mut().conflict_on_pick = true;
        self
    }

    pub(crate) fn mutations(&self) -> Vec<String> {
        self.state.borrow().mutations.clone()
    }

    pub(crate) fn branch_names(&self) -> Vec<String> {
        self.state.borrow().branches.keys().cloned().collect()
    }

    pub(crate) fn branch(&self, name: &str) -> Option<FakeBranch> {
        self.state.borrow().branches.get(name).cloned()
    }

    pub(crate) fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    pub(crate) fn message_reads(&self) -> usize {
        self.message_reads.get()
    }

    fn resolve_name(&self, name: &str) -> Option<String> {
        if name == "HEAD" {
            self.state.borrow().current.clone()
        } else {
            Some(name.to_string())
        }
    }

    fn record(&self, mutation: String) {
        self.state.borrow_mut().mutations.push(mutation);
    }

    fn unknown(name: &str) -> ClError {
        ClError::GitError(format!("unknown revision '{}'", name))
    }
}

impl Vcs for FakeVcs {
    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.branch_names())
    }

    fn upstream_of(&self, branch: &str) -> Result<Option<String>> {
        let Some(name) = self.resolve_name(branch) else {
            return Ok(None);
        };
        Ok(self
            .state
            .borrow()
            .branches
            .get(&name)
            .and_then(|b| b.upstream.clone()))
    }

    fn first_parent_range(&self, _base: &str, tip: &str) -> Result<Vec<CommitSummary>> {
        let name = self.resolve_name(tip).ok_or_else(|| Self::unknown(tip))?;
        self.state
            .borrow()
            .branches
            .get(&name)
            .map(|b| b.commits.clone())
            .ok_or_else(|| Self::unknown(tip))
    }

    fn has_merges(&self, _base: &str, tip: &str) -> Result<bool> {
        let name = self.resolve_name(tip).ok_or_else(|| Self::unknown(tip))?;
        Ok(self.state.borrow().merge_branches.contains(&name))
    }

    fn commit_message(&self, sha: &str) -> Result<String> {
        self.message_reads.set(self.message_reads.get() + 1);
        self.state
            .borrow()
            .messages
            .get(sha)
            .cloned()
            .ok_or_else(|| Self::unknown(sha))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.state.borrow().branches.contains_key(branch))
    }

    fn describe_tip(&self, refname: &str) -> Result<String> {
        let branch = self.branch(refname).ok_or_else(|| Self::unknown(refname))?;
        Ok(branch
            .commits
            .first()
            .map(|c| format!("{} {}", c.sha, c.title))
            .unwrap_or_else(|| "(no commits)".to_string()))
    }

    fn delete_branches(&self, branches: &[String]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for branch in branches {
            if state.branches.remove(branch).is_none() {
                return Err(Self::unknown(branch));
            }
        }
        state.mutations.push(format!("delete {}", branches.join(" ")));
        Ok(())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("fetch {} {}", remote, branch));
        Ok(())
    }

    fn reset_branch(&self, branch: &str, start: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.branches.insert(
            branch.to_string(),
            FakeBranch {
                upstream: Some(start.to_string()),
                commits: Vec::new(),
            },
        );
        state.current = Some(branch.to_string());
        state.mutations.push(format!("reset {} {}", branch, start));
        Ok(())
    }

    fn cherry_pick_range(&self, base: &str, tip: &str) -> Result<CherryPickOutcome> {
        self.record(format!("cherry-pick {}..{}", base, tip));
        if self.state.borrow().conflict_on_pick {
            return Ok(CherryPickOutcome::Conflicted {
                message: "could not apply c1... First".to_string(),
            });
        }

        let picked = self.first_parent_range(base, tip)?;
        let current = self.current().ok_or_else(|| Self::unknown("HEAD"))?;
        let mut state = self.state.borrow_mut();
        let head = state
            .branches
            .get_mut(&current)
            .ok_or_else(|| Self::unknown(&current))?;
        let mut commits = picked;
        commits.append(&mut head.commits);
        head.commits = commits;
        Ok(CherryPickOutcome::Applied)
    }

    fn set_upstream(&self, upstream: &str) -> Result<()> {
        let current = self.current().ok_or_else(|| Self::unknown("HEAD"))?;
        let mut state = self.state.borrow_mut();
        let branch = state
            .branches
            .get_mut(&current)
            .ok_or_else(|| Self::unknown(&current))?;
        branch.upstream = Some(upstream.to_string());
        state.mutations.push(format!("set-upstream {}", upstream));
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, refspec));
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().remotes.get(remote).cloned())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.remotes.insert(remote.to_string(), url.to_string());
        state.mutations.push(format!("set-url {} {}", remote, url));
        Ok(())
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.remotes.insert(remote.to_string(), url.to_string());
        state.mutations.push(format!("add-remote {} {}", remote, url));
        Ok(())
    }
}

// ============================================================================
// In-memory review server
// ============================================================================

/// A [`ReviewClient`] answering from a fixed table and counting queries.
#[derive(Debug, Default)]
pub(crate) struct FakeReview {
    changes: HashMap<String, Vec<RemoteChange>>,
    hook: Vec<u8>,
    failing: bool,
    queries: RefCell<Vec<(String, String)>>,
    hook_fetches: Cell<usize>,
}

impl FakeReview {
    pub(crate) fn new() -> Self {
        Self {
            hook: b"#!/bin/sh\n# commit-msg hook\n".to_vec(),
            ..Self::default()
        }
    }

    pub(crate) fn with_change(mut self, change_id: &str, number: u64, status: &str) -> Self {
        self.changes
            .entry(change_id.to_string())
            .or_default()
            .push(RemoteChange {
                number,
                status: ChangeStatus::from_remote(status),
                short_url: format!("http://crrev.com/c/{}", number),
            });
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }

    pub(crate) fn queried_projects(&self) -> Vec<String> {
        self.queries.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    pub(crate) fn hook_fetches(&self) -> usize {
        self.hook_fetches.get()
    }
}

impl ReviewClient for FakeReview {
    fn query_changes(&self, project: &str, change_id: &str) -> Result<Vec<RemoteChange>> {
        self.queries
            .borrow_mut()
            .push((project.to_string(), change_id.to_string()));
        if self.failing {
            return Err(ClError::ReviewError("connection refused".to_string()));
        }
        Ok(self.changes.get(change_id).cloned().unwrap_or_default())
    }

    fn fetch_commit_msg_hook(&self) -> Result<Vec<u8>> {
        self.hook_fetches.set(self.hook_fetches.get() + 1);
        if self.failing {
            return Err(ClError::ReviewError("connection refused".to_string()));
        }
        Ok(self.hook.clone())
    }
}

// ============================================================================
// Scripted prompt
// ============================================================================

/// Answers questions from a queue; an exhausted queue answers "no".
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub(crate) fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

// ============================================================================
// Command harness
// ============================================================================

/// Owns the fakes behind a [`Session`] and captures command output.
pub(crate) struct Harness {
    pub vcs: FakeVcs,
    pub review: FakeReview,
    pub config: Config,
    pub prompt: ScriptedPrompt,
    out: Vec<u8>,
}

impl Harness {
    pub(crate) fn new(vcs: FakeVcs) -> Self {
        Self {
            vcs,
            review: FakeReview::new(),
            config: Config::default(),
            prompt: ScriptedPrompt::default(),
            out: Vec::new(),
        }
    }

    pub(crate) fn with_review(mut self, review: FakeReview) -> Self {
        self.review = review;
        self
    }

    pub(crate) fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn answering(mut self, answers: &[bool]) -> Self {
        self.prompt = ScriptedPrompt::answering(answers);
        self
    }

    pub(crate) fn run<F>(&mut self, command: F) -> Result<()>
    where
        F: FnOnce(&mut Session<'_>) -> Result<()>,
    {
        let mut session = Session {
            vcs: &self.vcs,
            review: &self.review,
            config: &self.config,
            prompt: &mut self.prompt,
            out: &mut self.out,
        };
        command(&mut session)
    }

    pub(crate) fn output(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub(crate) fn take_output(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.out)).into_owned()
    }
}
