//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{ReleaseError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_block, display_command, display_dry_update, display_error, display_status,
    display_success, display_warning, format_command,
};

/// Source of yes/no answers for the confirmation steps of a workflow
pub trait Confirm {
    /// Ask `question`, returning whether the user agreed
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Asks on stdin; anything but "y"/"yes" is a no.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        print!("\n{} (y/N): ", question);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        let response = input.trim().to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}

/// Replays a fixed list of answers; answers "no" once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirm {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// Ask `question` and turn a "no" into [`ReleaseError::UserAbort`]
pub fn ask_or_abort(confirm: &dyn Confirm, question: &str) -> Result<()> {
    if confirm.confirm(question)? {
        Ok(())
    } else {
        Err(ReleaseError::aborted(question))
    }
}
