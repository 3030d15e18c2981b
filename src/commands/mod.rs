//! Command implementations for gerrit-cl.
//!
//! Every command receives a [`Session`]: the two adapters, the effective
//! configuration, the confirmation prompt and the output sink. Commands
//! never talk to git, the review server or the terminal any other way.

mod prune;
mod rebase;
mod status;
mod upload;

pub use prune::cmd_prune;
pub use rebase::cmd_rebase;
pub use status::cmd_status;
pub use upload::cmd_upload;

use crate::change::Resolver;
use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use crate::prompt::Confirm;
use crate::review::ReviewClient;
use crate::vcs::Vcs;
use std::io::Write;

/// Injected capabilities for one command invocation.
pub struct Session<'a> {
    pub vcs: &'a dyn Vcs,
    pub review: &'a dyn ReviewClient,
    pub config: &'a Config,
    pub prompt: &'a mut dyn Confirm,
    pub out: &'a mut dyn Write,
}

impl<'a> Session<'a> {
    /// A resolver scoped to the configured review project.
    pub fn resolver(&self) -> Resolver<'a> {
        let config: &'a Config = self.config;
        Resolver::new(self.vcs, self.review, &config.project)
    }
}

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, session: &mut Session<'_>) -> Result<()> {
    match command {
        Command::Status => cmd_status(session),
        Command::Prune(args) => cmd_prune(session, &args),
        Command::Rebase => cmd_rebase(session),
        Command::Upload(args) => cmd_upload(session, &args),
    }
}
