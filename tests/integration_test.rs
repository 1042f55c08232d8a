// tests/integration_test.rs
use std::process::{Command, Output};
use tempfile::TempDir;

fn pkg_release(args: &[&str]) -> Output {
    let cwd = TempDir::new().expect("Could not create temp dir");
    Command::new(env!("CARGO_BIN_EXE_pkg-release"))
        .args(args)
        .current_dir(cwd.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help() {
    let output = pkg_release(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("pkg-release"));
    assert!(stdout.contains("--gemspec"));
    assert!(stdout.contains("--dry"));
    assert!(stdout.contains("--bump"));
}

#[test]
fn test_version() {
    let output = pkg_release(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_redmine_not_implemented() {
    let output = pkg_release(&["redmine"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("redmine: not implemented yet"));
}

#[test]
fn test_unknown_command() {
    let output = pkg_release(&["publish"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("Unknown command 'publish'"));
    assert!(stderr.contains("gem, rpm, deb, redmine"));
}

#[test]
fn test_missing_command() {
    let output = pkg_release(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown command ''"));
}

#[test]
fn test_invalid_bump_unit() {
    let output = pkg_release(&["gem", "--bump", "w"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown part to bump: w"));
}

#[test]
fn test_gem_without_gemspec() {
    let output = pkg_release(&["gem", "-d"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No gemspec file found"));
}

#[test]
fn test_verbose_prints_error_chain() {
    let output = pkg_release(&["gem", "-v", "-g", "missing.gemspec"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("Failed to load gem from missing.gemspec"));
    assert!(stderr.contains("Caused by"));
}
