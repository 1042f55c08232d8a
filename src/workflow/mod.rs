//! Release workflows
//!
//! [gem::GemWorkflow] bumps, tags and publishes a gem from its source
//! checkout. [rpm::RpmWorkflow] and [deb::DebWorkflow] carry gems that are
//! newer than their downstream packages into the packaging repository and
//! open review requests for them. Both packaging workflows share the
//! candidate selection in this module and differ only in how they read the
//! downstream version, see [CurrentVersion].

pub mod deb;
pub mod gem;
pub mod rpm;

pub use deb::{DebWorkflow, PathOutcome};
pub use gem::{GemRelease, GemWorkflow};
pub use rpm::RpmWorkflow;

use crate::domain::{Package, PackagingSystem, Version};
use crate::error::{ReleaseError, Result};
use crate::files::FileFinder;
use crate::git::GitClient;
use std::path::{Path, PathBuf};

/// Version of a package as currently shipped by a packaging system
pub trait CurrentVersion {
    fn resolve_current_version(&self, package: &Package) -> Result<Version>;
}

/// A gem whose source version is ahead of its downstream package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub package: Package,
    /// Version in the gem source
    pub version: Version,
    /// Version currently packaged
    pub downstream: Version,
}

impl Candidate {
    pub fn name(&self) -> &str {
        self.package.name()
    }
}

/// Outcome of a packaging release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagingReport {
    /// Branches that were pushed for review, in order
    pub branches: Vec<String>,
    /// Packages carried to their new version
    pub updated: Vec<(String, Version)>,
    /// Package paths left alone because they already had the new version
    pub skipped: Vec<PathBuf>,
}

/// Every gem defined by a `*.gemspec` in `source_dir`, ordered by name
pub fn discover_packages(source_dir: &Path) -> Result<Vec<Package>> {
    let finder = FileFinder::new(source_dir);
    let mut packages = finder
        .find_all("*.gemspec", true)?
        .into_iter()
        .map(|gemspec| Package::from_gemspec(finder.resolve(gemspec)))
        .collect::<Result<Vec<_>>>()?;
    packages.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(packages)
}

/// Keep the packages whose source version is newer than the downstream one.
///
/// Fails with [ReleaseError::NothingToUpdate] if none is.
pub fn select_to_update(
    packages: Vec<Package>,
    downstream: &dyn CurrentVersion,
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for package in packages {
        let version = package.current_version()?;
        let packaged = downstream.resolve_current_version(&package)?;
        tracing::debug!(
            package = package.name(),
            %version,
            downstream = %packaged,
            "compared versions"
        );
        if packaged < version {
            candidates.push(Candidate {
                package,
                version,
                downstream: packaged,
            });
        }
    }

    if candidates.is_empty() {
        return Err(ReleaseError::NothingToUpdate);
    }
    Ok(candidates)
}

/// Branch carrying the release of `candidates`
pub fn version_branch(system: PackagingSystem, candidates: &[Candidate]) -> Result<String> {
    system
        .version_branch(candidates.iter().map(|c| (c.name(), c.version)))
        .ok_or(ReleaseError::NothingToUpdate)
}

/// `name version` pairs for status lines
pub(crate) fn describe(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("{} {}", c.name(), c.version))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Clean checkout of the up-to-date base branch
pub(crate) fn prepare_git(git: &GitClient, base_branch: &str, remote: &str) -> Result<()> {
    git.ensure_clean()?;
    git.checkout(base_branch)?;
    git.pull(remote)
}
