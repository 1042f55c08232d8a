use crate::domain::Version;
use std::fmt;

/// Downstream repository conventions that redistribute the gems as OS packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagingSystem {
    Rpm,
    Deb,
}

impl PackagingSystem {
    /// Short name used as branch namespace
    pub fn shortname(&self) -> &'static str {
        match self {
            PackagingSystem::Rpm => "rpm",
            PackagingSystem::Deb => "deb",
        }
    }

    /// Branch every packaging change is proposed against
    pub fn default_base_branch(&self) -> String {
        format!("{}/develop", self.shortname())
    }

    /// Name of the branch carrying a release.
    ///
    /// Derived from the lexicographically first candidate, so re-running the
    /// same release switches to the existing branch instead of creating a new
    /// one. Returns `None` when there are no candidates.
    pub fn version_branch<'a>(
        &self,
        candidates: impl IntoIterator<Item = (&'a str, Version)>,
    ) -> Option<String> {
        candidates
            .into_iter()
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(name, version)| format!("{}/{}-{}", self.shortname(), name, version))
    }
}

impl fmt::Display for PackagingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortname())
    }
}

/// Branch for the proxy bucket of a DEB release
pub fn proxy_branch(version_branch: &str) -> String {
    format!("{}-proxy", version_branch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_branches() {
        assert_eq!(PackagingSystem::Rpm.default_base_branch(), "rpm/develop");
        assert_eq!(PackagingSystem::Deb.default_base_branch(), "deb/develop");
    }

    #[test]
    fn test_version_branch_uses_first_name() {
        let candidates = vec![
            ("foreman_remote_execution", Version::new(4, 0, 0)),
            ("foreman_remote_execution_core", Version::new(1, 2, 0)),
            ("foreman_ansible", Version::new(9, 1, 1)),
        ];
        assert_eq!(
            PackagingSystem::Rpm.version_branch(candidates),
            Some("rpm/foreman_ansible-9.1.1".to_string())
        );
    }

    #[test]
    fn test_version_branch_empty() {
        let none: Vec<(&str, Version)> = Vec::new();
        assert_eq!(PackagingSystem::Deb.version_branch(none), None);
    }

    #[test]
    fn test_proxy_branch() {
        assert_eq!(proxy_branch("deb/foo-1.0.0"), "deb/foo-1.0.0-proxy");
    }
}
