//! Interactive yes/no confirmation.
//!
//! Commands receive a [`Confirm`] instead of reading the terminal
//! themselves, so tests can answer deterministically.

use crate::error::Result;
use std::io::{BufRead, IsTerminal, Write};

/// Asks the operator a yes/no question.
pub trait Confirm {
    /// Returns `true` only on an explicit yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self(question))
    }
}

/// Prompts on stderr and reads the answer from stdin.
///
/// A non-interactive stdin is treated as "no".
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            eprintln!("{} [y/N] no (stdin is not a terminal)", question);
            return Ok(false);
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "{} [y/N] ", question)?;
        stderr.flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(is_yes(&line))
    }
}

/// Whether a typed answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
