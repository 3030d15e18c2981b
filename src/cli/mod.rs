//! CLI argument parsing for gerrit-cl.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gerrit-cl: keep local git branches in step with their Gerrit reviews.
///
/// Each local commit is matched to a review change through its Change-Id
/// trailer. Branches whose changes are all merged or abandoned can be
/// pruned, and the current branch can be replayed onto a fresh upstream.
#[derive(Parser, Debug)]
#[command(name = "gerrit-cl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of `<repo>/.gerrit-cl.yaml`.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for gerrit-cl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all branches and their local commits with review status.
    Status,

    /// Delete branches whose changes have all been merged or abandoned.
    Prune(PruneArgs),

    /// Replay the current branch onto a freshly fetched upstream.
    ///
    /// Creates (or overwrites) `<current-branch>-rebase` at the upstream tip
    /// and cherry-picks the branch's changes onto it.
    Rebase,

    /// Upload the changes on HEAD for review.
    Upload(UploadArgs),
}

/// Arguments for the `prune` command.
#[derive(Parser, Debug, Default)]
pub struct PruneArgs {
    /// Delete without asking for confirmation.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `upload` command.
#[derive(Parser, Debug, Default, Clone)]
pub struct UploadArgs {
    /// Print what would be pushed without pushing.
    #[arg(long)]
    pub dry_run: bool,

    /// Add a reviewer to the uploaded changes.
    #[arg(long, value_name = "ID")]
    pub reviewer: Option<String>,

    /// Submit automatically once approved (implies --try).
    #[arg(long)]
    pub auto_submit: bool,

    /// Send the changes to the commit queue for submission.
    #[arg(long)]
    pub submit: bool,

    /// Start a dry run in the commit queue.
    #[arg(long = "try")]
    pub try_run: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
