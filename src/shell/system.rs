use crate::error::{ReleaseError, Result};
use crate::shell::{quote, Shell, ShellCommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Runs commands with `std::process`
pub struct SystemShell {
    /// Terminal invocation the review script is appended to as last argument
    terminal: Vec<String>,
}

impl SystemShell {
    pub fn new(terminal: Vec<String>) -> Self {
        SystemShell { terminal }
    }

    fn command(&self, dir: &Path, command: &ShellCommand) -> Command {
        let mut cmd = Command::new(resolve_program(dir, &command.program));
        cmd.args(&command.args).current_dir(dir);
        cmd
    }

    fn output(&self, dir: &Path, command: &ShellCommand) -> Result<Output> {
        let output = self.command(dir, command).output().map_err(|e| {
            ReleaseError::CommandFailed {
                command: command.to_string(),
                status: "not started".to_string(),
                output: e.to_string(),
            }
        })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                output: format!("{}{}", stdout, stderr).trim_end().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        SystemShell::new(
            ["gnome-terminal", "--wait", "--", "bash", "-c"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl Shell for SystemShell {
    fn capture(&self, dir: &Path, command: &ShellCommand) -> Result<String> {
        let output = self.output(dir, command)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    fn run(&self, dir: &Path, command: &ShellCommand) -> Result<()> {
        // Inherits stdio: `hub pull-request` opens an editor
        std::io::stdout().flush()?;
        let status = self
            .command(dir, command)
            .status()
            .map_err(|e| ReleaseError::CommandFailed {
                command: command.to_string(),
                status: "not started".to_string(),
                output: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ReleaseError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
                output: String::new(),
            })
        }
    }

    fn interactive(&self, dir: &Path, script: &str, message: &str) -> Result<bool> {
        let (program, args) = self
            .terminal
            .split_first()
            .ok_or_else(|| ReleaseError::config("terminal command is empty"))?;
        let session = format!("{}; echo {}; exec $SHELL", script, quote(message));

        let status = Command::new(program)
            .args(args)
            .arg(&session)
            .current_dir(dir)
            .status()
            .map_err(|e| ReleaseError::CommandFailed {
                command: format!("{} {}", self.terminal.join(" "), session),
                status: "not started".to_string(),
                output: e.to_string(),
            })?;
        Ok(status.success())
    }
}

/// Programs given as relative paths (`./bump_rpm.sh`) live in the working
/// directory, not in the directory pkg-release was started from.
fn resolve_program(dir: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        dir.join(path)
    } else {
        path.to_path_buf()
    }
}
