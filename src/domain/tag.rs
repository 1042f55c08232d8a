use crate::domain::Version;

/// Tag naming pattern (e.g., "v{version}", "core-v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Pattern for a gem; core gems share a repository with their plugin
    /// and are tagged with a `core-` prefix to keep the tags apart.
    pub fn for_gem(is_core: bool) -> Self {
        if is_core {
            TagPattern::new("core-v{version}")
        } else {
            TagPattern::new("v{version}")
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }
}
