use crate::domain::{TagPattern, Version, VERSION_PATTERN};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A releasable gem, anchored on its gemspec file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    gemspec: PathBuf,
    root: PathBuf,
}

impl Package {
    /// Build a package from a gemspec path; the name is the file stem.
    pub fn from_gemspec(gemspec: impl AsRef<Path>) -> Result<Self> {
        let gemspec = gemspec.as_ref();
        let name = gemspec
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                ReleaseError::AmbiguousMetadata(format!(
                    "Cannot derive a gem name from {}",
                    gemspec.display()
                ))
            })?
            .to_string();
        let root = match gemspec.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Package {
            name,
            gemspec: gemspec.to_path_buf(),
            root,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gemspec(&self) -> &Path {
        &self.gemspec
    }

    /// Directory holding the gemspec
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `lib/<name>/version.rb` next to the gemspec
    pub fn version_file(&self) -> PathBuf {
        self.root.join("lib").join(&self.name).join("version.rb")
    }

    /// Version declared by the `VERSION` constant of the version file
    pub fn current_version(&self) -> Result<Version> {
        let version_file = self.version_file();
        if !version_file.is_file() {
            return Err(ReleaseError::not_found(version_file.display().to_string()));
        }
        let content = fs::read_to_string(&version_file)?;
        Version::parse_captured(&content, &Self::version_declaration()?).map_err(|_| {
            ReleaseError::parse(format!(
                "Could not load version from {}",
                version_file.display()
            ))
        })
    }

    /// Matches the `VERSION` constant: group 1 is everything up to the
    /// version, group 2 the version itself. Rewrite with `${1}<version>`.
    pub fn version_declaration() -> Result<Regex> {
        Ok(Regex::new(&format!("(VERSION.*?)({})", VERSION_PATTERN))?)
    }

    /// Core gems follow the `<plugin>_core` naming convention
    pub fn is_core(&self) -> bool {
        self.name.ends_with("_core")
    }

    pub fn tag_pattern(&self) -> TagPattern {
        TagPattern::for_gem(self.is_core())
    }

    /// File name `gem build` produces for `version`
    pub fn gem_file(&self, version: &Version) -> String {
        format!("{}-{}.gem", self.name, version)
    }
}
