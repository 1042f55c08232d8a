use crate::domain::PackagingSystem;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV: &str = "PKG_RELEASE_CONFIG";

/// File name looked up in the current and the user config directory
pub const CONFIG_FILE: &str = "pkg-release.toml";

/// Represents the complete configuration for pkg-release.
///
/// Contains the packaging checkout location, git remotes, the review and
/// terminal commands and per-packaging-system settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Checkout of the repository holding the RPM and DEB packaging
    #[serde(default)]
    pub packaging_path: Option<PathBuf>,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub terminal: TerminalConfig,

    #[serde(default)]
    pub rpm: RpmConfig,

    #[serde(default)]
    pub deb: DebConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_review_remote() -> String {
    "fork".to_string()
}

fn default_gem_base_branch() -> String {
    "master".to_string()
}

/// Remotes and branches used by the git operations
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Remote that is pulled from and that gem releases are pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Personal fork the packaging branches are pushed to for review
    #[serde(default = "default_review_remote")]
    pub review_remote: String,

    /// Branch gem releases are cut from
    #[serde(default = "default_gem_base_branch")]
    pub gem_base_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            review_remote: default_review_remote(),
            gem_base_branch: default_gem_base_branch(),
        }
    }
}

fn default_review_command() -> Vec<String> {
    vec![
        "hub".to_string(),
        "pull-request".to_string(),
        "-b".to_string(),
        "{base}".to_string(),
    ]
}

/// Command opening a review request; `{base}` is replaced by the target branch
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReviewConfig {
    #[serde(default = "default_review_command")]
    pub command: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        ReviewConfig {
            command: default_review_command(),
        }
    }
}

fn default_terminal_command() -> Vec<String> {
    vec![
        "gnome-terminal".to_string(),
        "--wait".to_string(),
        "--".to_string(),
        "bash".to_string(),
        "-c".to_string(),
    ]
}

/// Terminal used for interactive review; the review script is appended
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TerminalConfig {
    #[serde(default = "default_terminal_command")]
    pub command: Vec<String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            command: default_terminal_command(),
        }
    }
}

fn default_rpm_base_branch() -> String {
    PackagingSystem::Rpm.default_base_branch()
}

fn default_bump_script() -> String {
    "./bump_rpm.sh".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RpmConfig {
    #[serde(default = "default_rpm_base_branch")]
    pub base_branch: String,

    /// Helper updating a package directory to the newest gem
    #[serde(default = "default_bump_script")]
    pub bump_script: String,
}

impl Default for RpmConfig {
    fn default() -> Self {
        RpmConfig {
            base_branch: default_rpm_base_branch(),
            bump_script: default_bump_script(),
        }
    }
}

fn default_deb_base_branch() -> String {
    PackagingSystem::Deb.default_base_branch()
}

fn default_changelog_script() -> String {
    "scripts/changelog.rb".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DebConfig {
    #[serde(default = "default_deb_base_branch")]
    pub base_branch: String,

    /// Helper adding a changelog entry for a new version
    #[serde(default = "default_changelog_script")]
    pub changelog_script: String,
}

impl Default for DebConfig {
    fn default() -> Self {
        DebConfig {
            base_branch: default_deb_base_branch(),
            changelog_script: default_changelog_script(),
        }
    }
}

impl Config {
    /// Packaging checkout, required by the rpm and deb workflows
    pub fn packaging_path(&self) -> Result<&Path> {
        self.packaging_path.as_deref().ok_or_else(|| {
            ReleaseError::config(format!(
                "packaging_path is not set; add it to {} or point {} at a config file",
                CONFIG_FILE, CONFIG_ENV
            ))
        })
    }

    /// Base branch of a packaging system
    pub fn base_branch(&self, system: PackagingSystem) -> &str {
        match system {
            PackagingSystem::Rpm => &self.rpm.base_branch,
            PackagingSystem::Deb => &self.deb.base_branch,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. The file named by `$PKG_RELEASE_CONFIG`
/// 3. `pkg-release.toml` in current directory
/// 4. `pkg-release.toml` in user config directory
/// 5. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        Some(PathBuf::from(path))
    } else if Path::new(CONFIG_FILE).exists() {
        Some(PathBuf::from(CONFIG_FILE))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .filter(|path| path.exists())
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            parse_config_file(&path)
        }
        None => Ok(Config::default()),
    }
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| ReleaseError::config(format!("cannot parse {}: {}", path.display(), e)))
}
