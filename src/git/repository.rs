use crate::error::{ReleaseError, Result};
use git2::{BranchType, Oid, Repository as Git2Repo, StatusOptions};
use std::path::Path;

/// Read-only view of a repository through git2
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    #[cfg(test)]
    fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Whether tracked files and the index match HEAD.
    ///
    /// Untracked files do not count, the same as
    /// `git diff --quiet && git diff --cached --quiet`.
    pub fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .all(|entry| entry.status() == git2::Status::CURRENT))
    }

    /// Short name of the checked out branch, `HEAD` when detached
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Ok("HEAD".to_string());
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::stale("HEAD is not valid UTF-8"))
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    /// Commit a full reference name points to, `None` if it does not exist
    pub fn resolve(&self, reference: &str) -> Result<Option<Oid>> {
        match self.repo.find_reference(reference) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repo) {
        let temp = TempDir::new().unwrap();
        let repo = Git2Repo::init(temp.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        fs::write(temp.path().join("README.md"), "hello\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        {
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = repo.signature().unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
                .unwrap();
        }
        (temp, repo)
    }

    #[test]
    fn test_clean_and_dirty() {
        let (temp, repo) = init_repo();
        let repo = Git2Repository::from_git2(repo);
        assert!(repo.is_clean().unwrap());

        fs::write(temp.path().join("untracked.txt"), "x").unwrap();
        assert!(repo.is_clean().unwrap());

        fs::write(temp.path().join("README.md"), "changed\n").unwrap();
        assert!(!repo.is_clean().unwrap());
    }

    #[test]
    fn test_branches_and_refs() {
        let (_temp, repo) = init_repo();
        let head = repo.head().unwrap().peel_to_commit().unwrap().id();
        let current = repo.head().unwrap().shorthand().unwrap().to_string();
        let repo = Git2Repository::from_git2(repo);

        assert_eq!(repo.current_branch().unwrap(), current);
        assert!(repo.branch_exists(&current));
        assert!(!repo.branch_exists("rpm/foo-1.0.0"));
        assert_eq!(
            repo.resolve(&format!("refs/heads/{}", current)).unwrap(),
            Some(head)
        );
        assert_eq!(repo.resolve("refs/remotes/origin/master").unwrap(), None);
    }
}
