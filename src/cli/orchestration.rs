//! Command dispatch
//!
//! Decouples the release commands from clap: `main.rs` turns the command
//! line into [ReleaseArgs] and [run] does the rest, so the dispatch can be
//! driven with a recording shell and scripted answers through [run_with].

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{load_config, Config};
use crate::domain::BumpUnit;
use crate::error::ReleaseError;
use crate::shell::{RunOptions, Shell, SystemShell};
use crate::ui::{self, Confirm, StdinConfirm};
use crate::workflow::gem::find_gemspec;
use crate::workflow::{DebWorkflow, GemWorkflow, PackagingReport, RpmWorkflow};

/// Every accepted command, in help order
pub const COMMANDS: [&str; 4] = ["gem", "rpm", "deb", "redmine"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Gem,
    Rpm,
    Deb,
    Redmine,
}

impl FromStr for Command {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gem" => Ok(Command::Gem),
            "rpm" => Ok(Command::Rpm),
            "deb" => Ok(Command::Deb),
            "redmine" => Ok(Command::Redmine),
            _ => Err(ReleaseError::UnknownCommand {
                command: s.to_string(),
                expected: COMMANDS.join(", "),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Gem => "gem",
            Command::Rpm => "rpm",
            Command::Deb => "deb",
            Command::Redmine => "redmine",
        };
        f.write_str(name)
    }
}

/// Arguments of one release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    pub command: Command,

    /// Gemspec given on the command line
    pub gemspec: Option<PathBuf>,

    pub bump: BumpUnit,

    /// Print mutating commands instead of running them
    pub dry_run: bool,

    /// Path to custom config file
    pub config_path: Option<String>,

    /// Gem source checkout, the current directory on the command line
    pub source_dir: PathBuf,
}

/// Load the configuration and run the command against the real system
pub fn run(args: &ReleaseArgs) -> Result<()> {
    if args.command == Command::Redmine {
        return Err(ReleaseError::NotImplemented(args.command.to_string()).into());
    }

    let config =
        load_config(args.config_path.as_deref()).context("Failed to load configuration")?;
    let shell = SystemShell::new(config.terminal.command.clone());
    run_with(args, &config, &shell, &StdinConfirm)
}

/// Run the command with an explicit configuration, shell and prompt
pub fn run_with(
    args: &ReleaseArgs,
    config: &Config,
    shell: &dyn Shell,
    confirm: &dyn Confirm,
) -> Result<()> {
    let options = RunOptions {
        dry_run: args.dry_run,
    };
    if options.dry_run {
        ui::display_status("Dry run: no command changing a repository will be executed");
    }

    match args.command {
        Command::Gem => {
            let gemspec = match &args.gemspec {
                Some(gemspec) => gemspec.clone(),
                None => find_gemspec(&args.source_dir)?,
            };
            let workflow = GemWorkflow::new(&gemspec, shell, options, config, confirm)
                .with_context(|| format!("Failed to load gem from {}", gemspec.display()))?;
            let release = workflow
                .release(args.bump)
                .with_context(|| format!("Failed to release {}", workflow.package().name()))?;
            ui::display_success(&format!(
                "Released {} {} (tag {})",
                release.name, release.version, release.tag
            ));
        }
        Command::Rpm => {
            let workflow = RpmWorkflow::new(config.packaging_path()?, shell, options, config)?;
            let report = workflow
                .release(&args.source_dir)
                .context("RPM release failed")?;
            display_report(&report);
        }
        Command::Deb => {
            let workflow = DebWorkflow::new(config.packaging_path()?, shell, options, config)?;
            let report = workflow
                .release(&args.source_dir)
                .context("DEB release failed")?;
            display_report(&report);
        }
        Command::Redmine => {
            return Err(ReleaseError::NotImplemented(args.command.to_string()).into());
        }
    }

    Ok(())
}

fn display_report(report: &PackagingReport) {
    for (name, version) in &report.updated {
        ui::display_success(&format!("Updated {} to {}", name, version));
    }
    for branch in &report.branches {
        ui::display_success(&format!("Requested review of {}", branch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;
    use crate::ui::ScriptedConfirm;

    #[test]
    fn test_command_from_str() {
        assert_eq!("gem".parse::<Command>().unwrap(), Command::Gem);
        assert_eq!("deb".parse::<Command>().unwrap(), Command::Deb);
        assert_eq!("redmine".parse::<Command>().unwrap(), Command::Redmine);
    }

    #[test]
    fn test_unknown_command() {
        let err = "publish".parse::<Command>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command 'publish'. Possible commands are gem, rpm, deb, redmine"
        );
        assert!(matches!(
            "".parse::<Command>(),
            Err(ReleaseError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_redmine_not_implemented() {
        let args = ReleaseArgs {
            command: Command::Redmine,
            gemspec: None,
            bump: BumpUnit::default(),
            dry_run: false,
            config_path: None,
            source_dir: PathBuf::from("."),
        };
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("not implemented yet"));
        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_packaging_commands_need_packaging_path() {
        let shell = RecordingShell::new();
        let confirm = ScriptedConfirm::default();
        let args = ReleaseArgs {
            command: Command::Rpm,
            gemspec: None,
            bump: BumpUnit::default(),
            dry_run: false,
            config_path: None,
            source_dir: PathBuf::from("."),
        };
        let err = run_with(&args, &Config::default(), &shell, &confirm).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::Config(_))
        ));
        assert!(shell.invocations().is_empty());
    }
}
