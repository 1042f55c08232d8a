// Fixtures shared by the integration tests
#![allow(dead_code)]

use git2::{IndexAddOption, Repository, RepositoryInitOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `files` (path, content) below `root`, creating directories
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("Could not create dir");
        fs::write(path, content).expect("Could not write file");
    }
}

/// Add a gemspec and `lib/<name>/version.rb` declaring `version`
pub fn write_gem(root: &Path, name: &str, version: &str) {
    let gemspec = format!("{}.gemspec", name);
    let version_file = format!("lib/{}/version.rb", name);
    let version_rb = format!("module Foo\n  VERSION = \"{}\".freeze\nend\n", version);
    write_files(
        root,
        &[
            (gemspec.as_str(), "Gem::Specification.new\n"),
            (version_file.as_str(), version_rb.as_str()),
        ],
    );
}

/// Repository on `master` with `files` committed and
/// `refs/remotes/origin/master` pointing at that commit
pub fn setup_test_repo(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Could not create temp dir");

    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    let repo = Repository::init_opts(temp_dir.path(), &options).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    write_files(temp_dir.path(), files);

    let mut index = repo.index().expect("Could not get index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("Could not add files to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let signature = repo.signature().expect("Could not get sig");
    let commit_id = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            "Initial commit",
            &tree,
            &[],
        )
        .expect("Could not create commit");

    repo.reference("refs/remotes/origin/master", commit_id, true, "fake fetch")
        .expect("Could not create remote ref");

    temp_dir
}

/// Gem source checkout with one committed gem
pub fn setup_gem_repo(name: &str, version: &str) -> TempDir {
    let temp_dir = setup_test_repo(&[]);
    write_gem(temp_dir.path(), name, version);
    commit_all(temp_dir.path(), "Add gem");
    temp_dir
}

/// Commit everything in the working tree on top of HEAD and move the
/// remote-tracking ref along
pub fn commit_all(root: &Path, message: &str) {
    let repo = Repository::open(root).expect("Could not open repo");
    let mut index = repo.index().expect("Could not get index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("Could not add files to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let parent = repo
        .head()
        .expect("Could not get HEAD")
        .peel_to_commit()
        .expect("HEAD is a commit");
    let signature = repo.signature().expect("Could not get sig");
    let commit_id = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )
        .expect("Could not create commit");

    repo.reference("refs/remotes/origin/master", commit_id, true, "fake fetch")
        .expect("Could not update remote ref");
}
