//! gerrit-cl: keep local git branches in step with their Gerrit reviews.
//!
//! This is the main entry point for the `gerrit-cl` CLI. It parses
//! arguments, sets up logging, wires the git and review adapters into a
//! command session, runs the pre-flight checks and dispatches.

mod bootstrap;
mod branch_status;
mod change;
mod cli;
mod commands;
mod config;
mod context;
mod error;
mod exit_codes;
mod fs;
mod git;
mod prompt;
mod review;
mod vcs;

#[cfg(test)]
mod test_support;

use cli::Cli;
use commands::Session;
use context::RepoContext;
use error::Result;
use prompt::TerminalPrompt;
use review::GerritClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vcs::GitCli;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = RepoContext::resolve(cli.config.as_deref())?;
    let vcs = GitCli::new(&ctx.repo_root);
    let review = GerritClient::new(&ctx.config)?;
    let mut prompt = TerminalPrompt;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut session = Session {
        vcs: &vcs,
        review: &review,
        config: &ctx.config,
        prompt: &mut prompt,
        out: &mut out,
    };

    bootstrap::run(&mut session, &ctx.commit_msg_hook_path())?;
    commands::dispatch(cli.command, &mut session)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
