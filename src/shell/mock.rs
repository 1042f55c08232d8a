use crate::error::{ReleaseError, Result};
use crate::shell::{Shell, ShellCommand};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// How a recorded command was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Capture,
    Run,
    Interactive,
}

/// One command seen by [RecordingShell]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: PathBuf,
    pub command: String,
    pub kind: InvocationKind,
}

/// Shell that records commands instead of running them
///
/// Commands are recorded as program and arguments joined by single spaces,
/// without shell quoting. Captured commands answer with the output
/// registered for the longest matching prefix, or an empty string.
pub struct RecordingShell {
    invocations: RefCell<Vec<Invocation>>,
    outputs: Vec<(String, String)>,
    failures: Vec<String>,
    approve_reviews: bool,
}

impl RecordingShell {
    /// Create a shell that succeeds on everything
    pub fn new() -> Self {
        RecordingShell {
            invocations: RefCell::new(Vec::new()),
            outputs: Vec::new(),
            failures: Vec::new(),
            approve_reviews: true,
        }
    }

    /// Answer captured commands starting with `prefix` with `output`
    pub fn with_output(mut self, prefix: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.push((prefix.into(), output.into()));
        self
    }

    /// Fail commands starting with `prefix`
    pub fn failing(mut self, prefix: impl Into<String>) -> Self {
        self.failures.push(prefix.into());
        self
    }

    /// Make every interactive review end with a non-zero status
    pub fn declining_reviews(mut self) -> Self {
        self.approve_reviews = false;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Commands executed with [Shell::run], rendered as strings
    pub fn commands(&self) -> Vec<String> {
        self.of_kind(InvocationKind::Run)
    }

    /// Scripts executed with [Shell::interactive]
    pub fn interactive_scripts(&self) -> Vec<String> {
        self.of_kind(InvocationKind::Interactive)
    }

    fn of_kind(&self, kind: InvocationKind) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter(|invocation| invocation.kind == kind)
            .map(|invocation| invocation.command.clone())
            .collect()
    }

    fn record(&self, dir: &Path, command: String, kind: InvocationKind) -> Result<()> {
        self.invocations.borrow_mut().push(Invocation {
            dir: dir.to_path_buf(),
            command: command.clone(),
            kind,
        });
        if self.failures.iter().any(|prefix| command.starts_with(prefix)) {
            return Err(ReleaseError::CommandFailed {
                command,
                status: "exit status: 1".to_string(),
                output: String::new(),
            });
        }
        Ok(())
    }
}

impl Default for RecordingShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for RecordingShell {
    fn capture(&self, dir: &Path, command: &ShellCommand) -> Result<String> {
        let rendered = render(command);
        self.record(dir, rendered.clone(), InvocationKind::Capture)?;
        Ok(self
            .outputs
            .iter()
            .filter(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }

    fn run(&self, dir: &Path, command: &ShellCommand) -> Result<()> {
        self.record(dir, render(command), InvocationKind::Run)
    }

    fn interactive(&self, dir: &Path, script: &str, _message: &str) -> Result<bool> {
        self.record(dir, script.to_string(), InvocationKind::Interactive)?;
        Ok(self.approve_reviews)
    }
}

fn render(command: &ShellCommand) -> String {
    std::iter::once(command.program.as_str())
        .chain(command.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
