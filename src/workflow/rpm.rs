use super::{describe, discover_packages, prepare_git, select_to_update, version_branch};
use super::{Candidate, CurrentVersion, PackagingReport};
use crate::config::Config;
use crate::domain::{Package, PackagingSystem, Version};
use crate::error::{ReleaseError, Result};
use crate::files::FileFinder;
use crate::git::{GitClient, ReviewSettings};
use crate::shell::{self, RunOptions, Shell, Workdir};
use crate::ui;
use std::path::{Path, PathBuf};

const REVIEW_MESSAGE: &str =
    "Review the dependencies: git commit --amend on update; exit 0 to confirm, exit 1 to cancel";

/// Carries new gem versions into the RPM packaging
pub struct RpmWorkflow<'a> {
    workdir: Workdir<'a>,
    git: GitClient<'a>,
    files: FileFinder,
    base_branch: String,
    remote: String,
    bump_script: String,
}

impl<'a> RpmWorkflow<'a> {
    pub fn new(
        packaging_path: &Path,
        shell: &'a dyn Shell,
        options: RunOptions,
        config: &Config,
    ) -> Result<Self> {
        let workdir = Workdir::new(packaging_path, shell, options);
        let git = GitClient::open(workdir.clone(), ReviewSettings::from_config(config))?;

        Ok(RpmWorkflow {
            workdir,
            git,
            files: FileFinder::new(packaging_path),
            base_branch: config.base_branch(PackagingSystem::Rpm).to_string(),
            remote: config.git.remote.clone(),
            bump_script: config.rpm.bump_script.clone(),
        })
    }

    /// Package directory, `packages/*/rubygem-<name>`
    pub fn package_path(&self, package: &Package) -> Result<PathBuf> {
        self.files
            .require_one(&format!("packages/*/rubygem-{}", package.name()))
    }

    pub fn spec_path(&self, package: &Package) -> Result<PathBuf> {
        let package_path = self.package_path(package)?;
        self.files
            .require_one(&format!("{}/*.spec", package_path.display()))
    }

    /// Update every outdated gem from `source_dir` on one branch and request
    /// a review for it
    pub fn release(&self, source_dir: &Path) -> Result<PackagingReport> {
        prepare_git(&self.git, &self.base_branch, &self.remote)?;

        let candidates = select_to_update(discover_packages(source_dir)?, self)?;
        let branch = version_branch(PackagingSystem::Rpm, &candidates)?;
        ui::display_status(&format!("Releasing {} on {}", describe(&candidates), branch));
        self.git.create_or_switch_branch(&branch)?;

        let mut report = PackagingReport::default();
        for candidate in &candidates {
            self.release_package(candidate)?;
            report
                .updated
                .push((candidate.name().to_string(), candidate.version));
        }

        self.git.request_review(&self.base_branch)?;
        report.branches.push(branch);
        Ok(report)
    }

    fn release_package(&self, candidate: &Candidate) -> Result<()> {
        let path = shell::quote(&self.package_path(&candidate.package)?.display().to_string());
        self.workdir.run_interactive(
            &format!("{} {}; cd {}", self.bump_script, path, path),
            REVIEW_MESSAGE,
        )
    }
}

impl CurrentVersion for RpmWorkflow<'_> {
    fn resolve_current_version(&self, package: &Package) -> Result<Version> {
        let spec = self.spec_path(package)?.display().to_string();
        let output = self.workdir.read(
            "rpmspec",
            ["--srpm", "-q", "--queryformat=%{v}", spec.as_str()],
        )?;
        Version::parse(output.trim()).map_err(|_| {
            ReleaseError::parse(format!(
                "Could not load version of {} from {}",
                package.name(),
                spec
            ))
        })
    }
}
