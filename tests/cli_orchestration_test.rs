// tests/cli_orchestration_test.rs
mod common;

use common::{setup_gem_repo, setup_test_repo, write_gem};
use pkg_release::cli::{run_with, Command, ReleaseArgs};
use pkg_release::config::Config;
use pkg_release::domain::BumpUnit;
use pkg_release::shell::RecordingShell;
use pkg_release::ui::ScriptedConfirm;
use pkg_release::ReleaseError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn args(command: Command, source_dir: PathBuf) -> ReleaseArgs {
    ReleaseArgs {
        command,
        gemspec: None,
        bump: BumpUnit::default(),
        dry_run: false,
        config_path: None,
        source_dir,
    }
}

#[test]
fn test_gem_found_in_source_dir() {
    let repo = setup_gem_repo("foo", "1.2.3");
    fs::write(repo.path().join("foo-1.2.4.gem"), "").unwrap();
    let shell = RecordingShell::new();
    let confirm = ScriptedConfirm::new([true, true]);

    run_with(
        &args(Command::Gem, repo.path().to_path_buf()),
        &Config::default(),
        &shell,
        &confirm,
    )
    .unwrap();

    assert!(shell.commands().contains(&"git tag v1.2.4".to_string()));
    assert!(shell.commands().contains(&"gem push foo-1.2.4.gem".to_string()));
}

#[test]
fn test_explicit_gemspec_and_dry_run() {
    let repo = setup_gem_repo("foo", "1.2.3");
    let shell = RecordingShell::new();
    let confirm = ScriptedConfirm::new([true, true]);
    let mut release = args(Command::Gem, PathBuf::from("/nonexistent"));
    release.gemspec = Some(repo.path().join("foo.gemspec"));
    release.bump = BumpUnit::Minor;
    release.dry_run = true;

    run_with(&release, &Config::default(), &shell, &confirm).unwrap();

    assert!(shell.commands().is_empty());
    assert_eq!(
        confirm.asked()[0],
        "Are you sure to push the following commit + tag v1.3.0 into origin?"
    );
}

#[test]
fn test_missing_explicit_gemspec() {
    let shell = RecordingShell::new();
    let confirm = ScriptedConfirm::default();
    let mut release = args(Command::Gem, PathBuf::from("."));
    release.gemspec = Some(PathBuf::from("/nonexistent/foo.gemspec"));

    let err = run_with(&release, &Config::default(), &shell, &confirm).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::NotFound { .. })
    ));
}

#[test]
fn test_rpm_uses_configured_packaging_path() {
    let packaging = setup_test_repo(&[(
        "packages/plugins/rubygem-foo/rubygem-foo.spec",
        "Version: 1.0.0\n",
    )]);
    let sources = TempDir::new().unwrap();
    write_gem(sources.path(), "foo", "1.0.1");
    let shell = RecordingShell::new().with_output("rpmspec", "1.0.0\n");
    let confirm = ScriptedConfirm::default();
    let config = Config {
        packaging_path: Some(packaging.path().to_path_buf()),
        ..Config::default()
    };

    run_with(
        &args(Command::Rpm, sources.path().to_path_buf()),
        &config,
        &shell,
        &confirm,
    )
    .unwrap();

    let invocations = shell.invocations();
    assert!(invocations.iter().all(|i| i.dir == packaging.path()));
    assert!(shell
        .commands()
        .contains(&"git checkout -b rpm/foo-1.0.1".to_string()));
}

#[test]
fn test_deb_nothing_to_update() {
    let packaging = setup_test_repo(&[(
        "plugins/ruby-foo/debian/changelog",
        "ruby-foo (1.0.1-1) stable; urgency=low\n",
    )]);
    let sources = TempDir::new().unwrap();
    write_gem(sources.path(), "foo", "1.0.1");
    let shell = RecordingShell::new();
    let confirm = ScriptedConfirm::default();
    let config = Config {
        packaging_path: Some(packaging.path().to_path_buf()),
        ..Config::default()
    };

    let err = run_with(
        &args(Command::Deb, sources.path().to_path_buf()),
        &config,
        &shell,
        &confirm,
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::NothingToUpdate)
    ));
    assert!(format!("{:#}", err).contains("No gems need update"));
}

#[test]
fn test_redmine() {
    let shell = RecordingShell::new();
    let confirm = ScriptedConfirm::default();

    let err = run_with(
        &args(Command::Redmine, PathBuf::from(".")),
        &Config::default(),
        &shell,
        &confirm,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "redmine: not implemented yet");
}
