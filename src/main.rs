use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pkg_release::cli::{self, Command, ReleaseArgs};
use pkg_release::domain::BumpUnit;
use pkg_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "pkg-release",
    version,
    about = "Release gems and carry new versions into the RPM and DEB packaging"
)]
struct Args {
    #[arg(value_name = "COMMAND", help = "One of gem, rpm, deb, redmine")]
    command: Option<String>,

    #[arg(short, long, value_name = "PATH", help = "Gemspec of the gem to release")]
    gemspec: Option<PathBuf>,

    #[arg(short, long, help = "Show the error chain and backtrace on failure")]
    verbose: bool,

    #[arg(short, long, help = "Print commands changing a repository instead of running them")]
    dry: bool,

    #[arg(
        short,
        long,
        value_name = "UNIT",
        default_value = "patch",
        help = "Version part to bump: major, minor or patch"
    )]
    bump: String,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() {
    let args = Args::parse();
    let verbose = args.verbose;
    if verbose {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
    setup_logging(verbose);

    if let Err(e) = run(args) {
        if verbose {
            eprintln!("{:?}", e);
        } else {
            ui::display_error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let command: Command = args.command.as_deref().unwrap_or_default().parse()?;
    let bump: BumpUnit = args.bump.parse()?;
    tracing::debug!(%command, %bump, dry_run = args.dry, "starting");

    let release = ReleaseArgs {
        command,
        gemspec: args.gemspec,
        bump,
        dry_run: args.dry,
        config_path: args.config,
        source_dir: std::env::current_dir()?,
    };
    cli::run(&release)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
