//! Git operations used by the release workflows
//!
//! Queries (clean check, branch listing, ref resolution) go through git2 and
//! always run. Everything that changes a repository or talks to a remote
//! shells out to `git` through a [Workdir], so it is echoed and skipped in
//! dry mode.

pub mod repository;

pub use repository::Git2Repository;

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::shell::Workdir;
use std::path::Path;

/// Where and how review requests are opened
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSettings {
    /// Remote the branch under review is pushed to
    pub remote: String,
    /// Review command; `{base}` is replaced by the target branch
    pub command: Vec<String>,
}

impl ReviewSettings {
    pub fn from_config(config: &Config) -> Self {
        ReviewSettings {
            remote: config.git.review_remote.clone(),
            command: config.review.command.clone(),
        }
    }
}

/// Git client bound to one working directory
pub struct GitClient<'a> {
    repo: Git2Repository,
    workdir: Workdir<'a>,
    review: ReviewSettings,
}

impl<'a> GitClient<'a> {
    /// Open the repository containing the working directory of `workdir`
    pub fn open(workdir: Workdir<'a>, review: ReviewSettings) -> Result<Self> {
        let repo = Git2Repository::open(workdir.dir())?;
        Ok(GitClient {
            repo,
            workdir,
            review,
        })
    }

    pub fn dir(&self) -> &Path {
        self.workdir.dir()
    }

    /// Fail with [ReleaseError::DirtyWorkdir] on uncommitted changes
    pub fn ensure_clean(&self) -> Result<()> {
        if self.repo.is_clean()? {
            Ok(())
        } else {
            Err(ReleaseError::DirtyWorkdir(self.dir().to_path_buf()))
        }
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.workdir.run("git", ["checkout", branch])
    }

    /// Create `name` from the current HEAD, or switch to it if it exists
    pub fn create_or_switch_branch(&self, name: &str) -> Result<()> {
        if self.repo.branch_exists(name) {
            self.workdir.run("git", ["checkout", name])
        } else {
            self.workdir.run("git", ["checkout", "-b", name])
        }
    }

    pub fn pull(&self, remote: &str) -> Result<()> {
        self.workdir.run("git", ["pull", remote])
    }

    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.workdir.run("git", ["fetch", remote])
    }

    /// Fail with [ReleaseError::StaleBranch] unless `expected_branch` is
    /// checked out and matches its counterpart on `remote` after a fetch.
    pub fn ensure_up_to_date(&self, expected_branch: &str, remote: &str) -> Result<()> {
        let branch = self.repo.current_branch()?;
        if branch != expected_branch {
            return Err(ReleaseError::stale(format!(
                "current branch {} doesn't equal expected branch {}",
                branch, expected_branch
            )));
        }

        self.fetch(remote)?;

        let local = self.repo.resolve(&format!("refs/heads/{}", expected_branch))?;
        let remote_ref = format!("{}/{}", remote, expected_branch);
        let upstream = self.repo.resolve(&format!("refs/remotes/{}", remote_ref))?;
        match (local, upstream) {
            (Some(local), Some(upstream)) if local == upstream => Ok(()),
            (Some(local), Some(upstream)) => Err(ReleaseError::stale(format!(
                "local sha {} ({}) doesn't equal remote sha {} ({})",
                local, expected_branch, upstream, remote_ref
            ))),
            (_, None) => Err(ReleaseError::stale(format!(
                "remote branch {} not found",
                remote_ref
            ))),
            (None, _) => Err(ReleaseError::stale(format!(
                "local branch {} not found",
                expected_branch
            ))),
        }
    }

    pub fn add(&self, path: &Path) -> Result<()> {
        self.workdir
            .run("git", ["add".to_string(), path.display().to_string()])
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.workdir.run("git", ["commit", "-m", message])
    }

    pub fn tag(&self, name: &str) -> Result<()> {
        self.workdir.run("git", ["tag", name])
    }

    pub fn push(&self, remote: &str, reference: &str) -> Result<()> {
        self.workdir.run("git", ["push", remote, reference])
    }

    /// `git show` output for a reference
    pub fn show(&self, reference: &str) -> Result<String> {
        self.workdir.read("git", ["show", reference])
    }

    /// Push HEAD to the review remote and open a review request against
    /// `target_branch`
    pub fn request_review(&self, target_branch: &str) -> Result<()> {
        let (program, args) = self
            .review
            .command
            .split_first()
            .ok_or_else(|| ReleaseError::config("review command is empty"))?;
        self.push(&self.review.remote, "HEAD")?;
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.replace("{base}", target_branch))
            .collect();
        self.workdir.run(program, args)
    }
}
