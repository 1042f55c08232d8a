use super::{describe, discover_packages, prepare_git, select_to_update, version_branch};
use super::{Candidate, CurrentVersion, PackagingReport};
use crate::config::Config;
use crate::domain::{proxy_branch, Package, PackagingSystem, Version, VERSION_PATTERN};
use crate::error::{ReleaseError, Result};
use crate::files::{self, FileFinder};
use crate::git::{GitClient, ReviewSettings};
use crate::shell::{self, RunOptions, Shell, Workdir};
use crate::ui;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const REVIEW_MESSAGE: &str =
    "Review the dependencies: git add on update, exit 0 to confirm, exit 1 to cancel";

/// What happened to one package path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    Updated,
    /// The path already ships the new version
    AlreadyCurrent,
}

/// Packages of the smart proxy live in their own branch and review.
///
/// That is everything under `dependencies/` and every path naming
/// `smart_proxy`.
pub fn is_proxy_path(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path.starts_with("dependencies") || path.contains("smart_proxy")
}

/// Package paths of one candidate
type Bucket<'c> = Vec<(&'c Candidate, Vec<PathBuf>)>;

/// Carries new gem versions into the DEB packaging
pub struct DebWorkflow<'a> {
    workdir: Workdir<'a>,
    git: GitClient<'a>,
    files: FileFinder,
    base_branch: String,
    remote: String,
    changelog_script: String,
}

impl<'a> DebWorkflow<'a> {
    pub fn new(
        packaging_path: &Path,
        shell: &'a dyn Shell,
        options: RunOptions,
        config: &Config,
    ) -> Result<Self> {
        let workdir = Workdir::new(packaging_path, shell, options);
        let git = GitClient::open(workdir.clone(), ReviewSettings::from_config(config))?;

        Ok(DebWorkflow {
            workdir,
            git,
            files: FileFinder::new(packaging_path),
            base_branch: config.base_branch(PackagingSystem::Deb).to_string(),
            remote: config.git.remote.clone(),
            changelog_script: config.deb.changelog_script.clone(),
        })
    }

    /// Every directory packaging `package`.
    ///
    /// Both the gem name and its dashed variant are looked up under
    /// `plugins/*<variant>` and `dependencies/*/<variant>`.
    pub fn package_paths(&self, package: &Package) -> Result<Vec<PathBuf>> {
        let mut variants = vec![package.name().to_string()];
        let dashed = package.name().replace('_', "-");
        if dashed != variants[0] {
            variants.push(dashed);
        }

        let patterns: Vec<String> = variants
            .iter()
            .flat_map(|variant| {
                [
                    format!("plugins/*{}", variant),
                    format!("dependencies/*/{}", variant),
                ]
            })
            .collect();

        let mut paths = Vec::new();
        for pattern in &patterns {
            for path in self.files.find_all(pattern, true)? {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }

        if paths.is_empty() {
            tracing::debug!(package = package.name(), "no DEB package candidates");
            return Err(ReleaseError::not_found(patterns.join(", ")));
        }
        Ok(paths)
    }

    pub fn changelog(&self, path: &Path) -> Result<PathBuf> {
        self.files
            .require_one(&format!("{}/**/changelog", path.display()))
    }

    /// Version in the first line of the changelog under `path`
    pub fn path_version(&self, path: &Path) -> Result<Version> {
        let changelog = self.changelog(path)?;
        let content = fs::read_to_string(self.files.resolve(&changelog))?;
        let first_line = content.lines().next().unwrap_or_default();
        Version::parse(first_line).map_err(|_| {
            ReleaseError::parse(format!(
                "Could not load version from changelog {}",
                changelog.display()
            ))
        })
    }

    /// Update every outdated gem from `source_dir`.
    ///
    /// Paths are split into a core and a proxy bucket, each released on its
    /// own branch with its own review request. Paths already at the new
    /// version are left out, and a bucket left empty gets neither.
    pub fn release(&self, source_dir: &Path) -> Result<PackagingReport> {
        prepare_git(&self.git, &self.base_branch, &self.remote)?;

        let candidates = select_to_update(discover_packages(source_dir)?, self)?;
        let branch = version_branch(PackagingSystem::Deb, &candidates)?;
        ui::display_status(&format!("Releasing {}", describe(&candidates)));

        let mut report = PackagingReport::default();
        let mut core: Bucket = Vec::new();
        let mut proxy: Bucket = Vec::new();
        for candidate in &candidates {
            let (proxy_paths, core_paths): (Vec<_>, Vec<_>) = self
                .outdated_paths(candidate, &mut report)?
                .into_iter()
                .partition(|path| is_proxy_path(path));
            if !core_paths.is_empty() {
                core.push((candidate, core_paths));
            }
            if !proxy_paths.is_empty() {
                proxy.push((candidate, proxy_paths));
            }
        }

        if !core.is_empty() {
            self.git.create_or_switch_branch(&branch)?;
            self.release_bucket(&core, &candidates, &mut report)?;
            self.git.request_review(&self.base_branch)?;
            report.branches.push(branch.clone());
        }

        if !proxy.is_empty() {
            let branch = proxy_branch(&branch);
            self.git.checkout(&self.base_branch)?;
            self.git.create_or_switch_branch(&branch)?;
            self.release_bucket(&proxy, &candidates, &mut report)?;
            self.git.request_review(&self.base_branch)?;
            report.branches.push(branch);
        }

        Ok(report)
    }

    /// Package paths of `candidate` still behind its version. The others
    /// are reported as skipped.
    fn outdated_paths(
        &self,
        candidate: &Candidate,
        report: &mut PackagingReport,
    ) -> Result<Vec<PathBuf>> {
        let mut outdated = Vec::new();
        for path in self.package_paths(&candidate.package)? {
            if self.path_version(&path)? >= candidate.version {
                ui::display_warning(&format!(
                    "{} already at {}, skipping",
                    path.display(),
                    candidate.version
                ));
                report.skipped.push(path);
            } else {
                outdated.push(path);
            }
        }
        Ok(outdated)
    }

    fn release_bucket(
        &self,
        bucket: &Bucket,
        candidates: &[Candidate],
        report: &mut PackagingReport,
    ) -> Result<()> {
        for (candidate, paths) in bucket {
            let mut updated = false;
            for path in paths {
                if self.release_at_path(candidate, path, candidates)? == PathOutcome::Updated {
                    updated = true;
                }
            }

            if updated {
                self.git.commit(&format!(
                    "Update {} to {}",
                    candidate.name(),
                    candidate.version
                ))?;
                report
                    .updated
                    .push((candidate.name().to_string(), candidate.version));
            }
        }
        Ok(())
    }

    /// Bring one package path to the candidate version and open it for
    /// review
    pub fn release_at_path(
        &self,
        candidate: &Candidate,
        path: &Path,
        candidates: &[Candidate],
    ) -> Result<PathOutcome> {
        let old_version = self.path_version(path)?;
        if old_version >= candidate.version {
            return Ok(PathOutcome::AlreadyCurrent);
        }
        let new_version = candidate.version.to_string();
        let dry_run = self.workdir.is_dry_run();

        let changelog = self.changelog(path)?;
        self.workdir.run(
            &self.changelog_script,
            [
                "-v".to_string(),
                new_version.clone(),
                changelog.display().to_string(),
            ],
        )?;

        if let Some(declaration) = self
            .files
            .find_one(&format!("{}/*.rb", path.display()), true)?
        {
            let re = Regex::new(&format!(
                "({}.*?){}",
                regex::escape(candidate.name()),
                VERSION_PATTERN
            ))?;
            files::substitute(
                &self.files.resolve(declaration),
                &re,
                &format!("${{1}}{}", new_version),
                dry_run,
            )?;
        }

        if let Some(gem_list) = self
            .files
            .find_one(&format!("{}/**/gem.list", path.display()), true)?
        {
            let gem_list = self.files.resolve(gem_list);
            let content = fs::read_to_string(&gem_list)?;
            for other in candidates {
                let re = Regex::new(&format!(
                    "({}-){}",
                    regex::escape(other.name()),
                    VERSION_PATTERN
                ))?;
                if re.is_match(&content) {
                    files::substitute(&gem_list, &re, &format!("${{1}}{}", other.version), dry_run)?;
                }
            }
        }

        self.git.add(path)?;
        self.workdir.run_interactive(
            &format!(
                "cd {}; gem compare -b {} {} {}",
                shell::quote(&path.display().to_string()),
                candidate.name(),
                old_version,
                new_version
            ),
            REVIEW_MESSAGE,
        )?;
        Ok(PathOutcome::Updated)
    }
}

impl CurrentVersion for DebWorkflow<'_> {
    /// The oldest version across all paths packaging the gem
    fn resolve_current_version(&self, package: &Package) -> Result<Version> {
        let mut oldest: Option<Version> = None;
        for path in self.package_paths(package)? {
            let version = self.path_version(&path)?;
            oldest = Some(oldest.map_or(version, |current| current.min(version)));
        }
        oldest.ok_or_else(|| ReleaseError::not_found(package.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_paths() {
        assert!(is_proxy_path(Path::new("dependencies/bionic/foreman_tasks_core")));
        assert!(is_proxy_path(Path::new("plugins/smart_proxy_remote_execution_ssh")));
        assert!(!is_proxy_path(Path::new("plugins/ruby-foreman-tasks")));
        assert!(!is_proxy_path(Path::new("plugins/ruby-foreman-remote-execution")));
    }
}
