//! External command execution
//!
//! Every external tool (git, rpmspec, gem, packaging helper scripts, the
//! review terminal) is started through the [Shell] trait, so the workflows
//! can be exercised against [mock::RecordingShell] in tests.
//!
//! # Overview
//!
//! - [Shell]: how a command is executed (captured, plain or interactive)
//! - [system::SystemShell]: the real implementation on top of `std::process`
//! - [Workdir]: a directory plus a shell plus the [RunOptions]; every
//!   command a workflow runs goes through one, which decides whether a
//!   command is skipped in dry mode
//!
//! ```rust
//! # use pkg_release::shell::{RunOptions, Workdir, mock::RecordingShell};
//! let shell = RecordingShell::new();
//! let workdir = Workdir::new("/tmp", &shell, RunOptions { dry_run: true });
//! workdir.run("git", ["push", "origin", "HEAD"]).unwrap();
//! assert!(shell.invocations().is_empty());
//! ```

pub mod mock;
pub mod system;

pub use mock::RecordingShell;
pub use system::SystemShell;

use crate::error::{ReleaseError, Result};
use crate::ui;
use std::fmt;
use std::path::{Path, PathBuf};

/// Runtime switches threaded through every component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log mutating commands and file updates instead of performing them
    pub dry_run: bool,
}

/// A program with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ShellCommand {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts =
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(parts) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => write!(f, "{} {}", self.program, self.args.join(" ")),
        }
    }
}

/// Command execution backend
pub trait Shell {
    /// Run `command` in `dir` and return its stdout
    ///
    /// A non-zero exit yields [ReleaseError::CommandFailed].
    fn capture(&self, dir: &Path, command: &ShellCommand) -> Result<String>;

    /// Run `command` in `dir`, letting its output through to the user
    ///
    /// A non-zero exit yields [ReleaseError::CommandFailed].
    fn run(&self, dir: &Path, command: &ShellCommand) -> Result<()>;

    /// Run a shell `script` in an interactive terminal opened in `dir`
    ///
    /// The terminal stays open for manual work after the script finishes and
    /// `message` tells the user how to leave it. Returns whether the session
    /// ended with exit status 0.
    fn interactive(&self, dir: &Path, script: &str, message: &str) -> Result<bool>;
}

/// Commands scoped to one working directory
#[derive(Clone)]
pub struct Workdir<'a> {
    dir: PathBuf,
    shell: &'a dyn Shell,
    options: RunOptions,
}

impl<'a> Workdir<'a> {
    pub fn new(dir: impl Into<PathBuf>, shell: &'a dyn Shell, options: RunOptions) -> Self {
        Workdir {
            dir: dir.into(),
            shell,
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Run a read-only command; executes in dry mode too.
    pub fn read<I, S>(&self, program: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = ShellCommand::new(program, args);
        tracing::debug!(dir = %self.dir.display(), %command, "query");
        self.shell.capture(&self.dir, &command)
    }

    /// Run a mutating command; only echoed in dry mode.
    pub fn run<I, S>(&self, program: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = ShellCommand::new(program, args);
        ui::display_command(&command.to_string(), None, self.options.dry_run);
        if self.options.dry_run {
            return Ok(());
        }
        tracing::debug!(dir = %self.dir.display(), %command, "run");
        self.shell.run(&self.dir, &command)
    }

    /// Open an interactive terminal running `script` for manual review.
    ///
    /// Only echoed in dry mode. A session ending with a non-zero status is the
    /// reviewer cancelling and yields [ReleaseError::UserAbort].
    pub fn run_interactive(&self, script: &str, message: &str) -> Result<()> {
        ui::display_command(script, Some(message), self.options.dry_run);
        if self.options.dry_run {
            return Ok(());
        }
        tracing::debug!(dir = %self.dir.display(), script, "interactive");
        if self.shell.interactive(&self.dir, script, message)? {
            Ok(())
        } else {
            Err(ReleaseError::aborted(format!("review of `{}` cancelled", script)))
        }
    }
}

/// Quote a single word for use inside a `bash -c` script
pub fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| word.to_string())
}
