use crate::config::Config;
use crate::domain::{BumpUnit, Package, Version};
use crate::error::{ReleaseError, Result};
use crate::files::{self, FileFinder};
use crate::git::{GitClient, ReviewSettings};
use crate::shell::{RunOptions, Shell, Workdir};
use crate::ui::{self, Confirm};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a gem release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemRelease {
    pub name: String,
    pub version: Version,
    pub tag: String,
    pub gem_file: String,
}

/// Find the only gemspec in `dir`
pub fn find_gemspec(dir: &Path) -> Result<PathBuf> {
    let finder = FileFinder::new(dir);
    let mut specs = finder.find_all("*.gemspec", true)?;
    match specs.len() {
        0 => Err(ReleaseError::AmbiguousMetadata(
            "No gemspec file found".to_string(),
        )),
        1 => Ok(finder.resolve(specs.remove(0))),
        _ => Err(ReleaseError::AmbiguousMetadata(format!(
            "More than one gemspecs found: {:?}",
            specs
        ))),
    }
}

/// Bumps, tags, pushes and publishes one gem from its source checkout
pub struct GemWorkflow<'a> {
    package: Package,
    workdir: Workdir<'a>,
    git: GitClient<'a>,
    confirm: &'a dyn Confirm,
    remote: String,
    base_branch: String,
}

impl<'a> GemWorkflow<'a> {
    /// Set up the release of the gem defined by `gemspec`.
    ///
    /// Commands run in the directory holding the gemspec.
    pub fn new(
        gemspec: &Path,
        shell: &'a dyn Shell,
        options: RunOptions,
        config: &Config,
        confirm: &'a dyn Confirm,
    ) -> Result<Self> {
        if !gemspec.is_file() {
            return Err(ReleaseError::not_found(gemspec.display().to_string()));
        }
        let package = Package::from_gemspec(fs::canonicalize(gemspec)?)?;
        let workdir = Workdir::new(package.root(), shell, options);
        let git = GitClient::open(workdir.clone(), ReviewSettings::from_config(config))?;

        Ok(GemWorkflow {
            package,
            workdir,
            git,
            confirm,
            remote: config.git.remote.clone(),
            base_branch: config.git.gem_base_branch.clone(),
        })
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Bump, build and publish
    pub fn release(&self, unit: BumpUnit) -> Result<GemRelease> {
        let (version, tag) = self.bump_version(unit)?;
        let gem_file = self.push_gem(&version)?;
        Ok(GemRelease {
            name: self.package.name().to_string(),
            version,
            tag,
            gem_file,
        })
    }

    /// Commit and tag the next version, then push both after confirmation.
    ///
    /// Returns the new version and its tag.
    pub fn bump_version(&self, unit: BumpUnit) -> Result<(Version, String)> {
        self.git.ensure_clean()?;

        let next_version = self.package.current_version()?.bump(unit)?;
        ui::display_status(&format!(
            "Bumping version of {} to {}",
            self.package.name(),
            next_version
        ));
        self.git.ensure_up_to_date(&self.base_branch, &self.remote)?;

        let version_file = self.package.version_file();
        files::substitute(
            &version_file,
            &Package::version_declaration()?,
            &format!("${{1}}{}", next_version),
            self.workdir.is_dry_run(),
        )?;

        let description = if self.package.is_core() { " core" } else { "" };
        let next_tag = self.package.tag_pattern().format(&next_version);
        self.git.add(&version_file)?;
        self.git
            .commit(&format!("Bump{} version to {}", description, next_version))?;
        self.git.tag(&next_tag)?;

        let head = self.git.show("HEAD")?;
        ui::display_block("HEAD", &head);
        ui::ask_or_abort(
            self.confirm,
            &format!(
                "Are you sure to push the following commit + tag {} into {}?",
                next_tag, self.remote
            ),
        )?;
        self.git.push(&self.remote, "HEAD")?;
        self.git.push(&self.remote, &next_tag)?;

        Ok((next_version, next_tag))
    }

    /// Build the gem for `version` and push it to rubygems after confirmation
    pub fn push_gem(&self, version: &Version) -> Result<String> {
        let gemspec = self
            .package
            .gemspec()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.package.gemspec().display().to_string());
        self.workdir.run("gem", ["build", gemspec.as_str()])?;

        let gem_file = self.package.gem_file(version);
        if !self.workdir.is_dry_run() && !self.package.root().join(&gem_file).is_file() {
            return Err(ReleaseError::not_found(gem_file));
        }

        ui::ask_or_abort(self.confirm, &format!("Push {} to rubygems?", gem_file))?;
        self.workdir.run("gem", ["push", gem_file.as_str()])?;
        ui::display_success(&format!("Released {}", gem_file));
        Ok(gem_file)
    }
}
