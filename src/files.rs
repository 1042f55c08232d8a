//! File lookup by glob pattern and in-place regex substitution

use crate::error::{ReleaseError, Result};
use crate::ui;
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves glob patterns relative to a fixed root directory.
///
/// Returned paths are relative to the root, the way a shell started in the
/// root would see them.
#[derive(Debug, Clone)]
pub struct FileFinder {
    root: PathBuf,
}

impl FileFinder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileFinder { root: root.into() }
    }

    /// Absolute (root-joined) location of a root-relative path
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Find the single file matching `pattern`.
    ///
    /// More than one match is always an error. No match is an error unless
    /// `allow_empty`, in which case `None` is returned.
    pub fn find_one(&self, pattern: &str, allow_empty: bool) -> Result<Option<PathBuf>> {
        let mut candidates = self.glob(pattern)?;
        match candidates.len() {
            0 if allow_empty => Ok(None),
            0 => Err(ReleaseError::not_found(pattern)),
            1 => Ok(candidates.pop()),
            _ => Err(ReleaseError::AmbiguousMatch {
                pattern: pattern.to_string(),
                candidates,
            }),
        }
    }

    /// [FileFinder::find_one] for files that must exist
    pub fn require_one(&self, pattern: &str) -> Result<PathBuf> {
        self.find_one(pattern, false)?
            .ok_or_else(|| ReleaseError::not_found(pattern))
    }

    /// Find every file matching `pattern`; no match is an error unless `allow_empty`.
    pub fn find_all(&self, pattern: &str, allow_empty: bool) -> Result<Vec<PathBuf>> {
        let candidates = self.glob(pattern)?;
        if candidates.is_empty() && !allow_empty {
            return Err(ReleaseError::not_found(pattern));
        }
        Ok(candidates)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let root = Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{}", root.trim_end_matches('/'), pattern);
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut matches = Vec::new();
        for entry in glob::glob_with(&full, options)? {
            let path = entry.map_err(|e| ReleaseError::Io(e.into_error()))?;
            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or(path);
            matches.push(relative);
        }
        tracing::trace!(pattern = %full, found = matches.len(), "glob");
        Ok(matches)
    }
}

/// Replace the first match of `re` in `path` with `replacement`.
///
/// `replacement` uses [Regex::replace] syntax (`${1}` for groups). Fails
/// with [ReleaseError::NoChange] when `re` does not match. In dry mode the
/// would-be content is printed and the file is left untouched.
pub fn substitute(path: &Path, re: &Regex, replacement: &str, dry_run: bool) -> Result<()> {
    let content = fs::read_to_string(path)?;
    if !re.is_match(&content) {
        return Err(ReleaseError::NoChange {
            path: path.to_path_buf(),
            pattern: re.to_string(),
            replacement: replacement.to_string(),
        });
    }

    let updated = re.replace(&content, replacement);
    if dry_run {
        ui::display_dry_update(&path.display().to_string(), &updated);
    } else {
        tracing::debug!(path = %path.display(), pattern = %re, "substitute");
        fs::write(path, updated.as_bytes())?;
    }
    Ok(())
}
