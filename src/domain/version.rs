use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Pattern every version in changelogs, spec files and version files follows
pub const VERSION_PATTERN: &str = r"[0-9]+\.[0-9]+\.[0-9]+";

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first `x.y.z` found anywhere in `text`
    pub fn parse(text: &str) -> Result<Self> {
        let re = Regex::new(VERSION_PATTERN)?;
        let found = re
            .find(text)
            .ok_or_else(|| ReleaseError::parse(format!("No version found in '{}'", text.trim())))?;
        Self::from_triple(found.as_str())
    }

    /// Extract the version from the last capture group of `re`
    ///
    /// Used where the version has to be anchored to a marker, e.g.
    /// `(VERSION.*?)([0-9]+\.[0-9]+\.[0-9]+)` for gem version files.
    pub fn parse_captured(text: &str, re: &Regex) -> Result<Self> {
        let found = re
            .captures(text)
            .and_then(|caps| caps.iter().skip(1).last().flatten())
            .ok_or_else(|| {
                ReleaseError::parse(format!("Pattern '{}' did not match any version", re))
            })?;
        Self::from_triple(found.as_str())
    }

    /// Leading zeros are allowed, `2019.01.15` reads as `2019.1.15`
    fn from_triple(triple: &str) -> Result<Self> {
        let mut segments = triple.splitn(3, '.').map(|segment| {
            segment.parse::<u64>().map_err(|e| {
                ReleaseError::parse(format!("Invalid version '{}': {}", triple, e))
            })
        });
        let mut next = || {
            segments
                .next()
                .unwrap_or_else(|| Err(ReleaseError::parse(format!("Invalid version '{}'", triple))))
        };
        Ok(Version::new(next()?, next()?, next()?))
    }

    /// Segment-wise numeric comparison
    pub fn compare(&self, other: &Version) -> Ordering {
        self.cmp(other)
    }

    /// Bump version according to bump unit
    pub fn bump(&self, unit: BumpUnit) -> Result<Self> {
        let increment = |segment: u64| {
            segment.checked_add(1).ok_or_else(|| {
                ReleaseError::parse(format!("Cannot bump {} of {}", unit, self))
            })
        };
        Ok(match unit {
            BumpUnit::Major => Version::new(increment(self.major)?, 0, 0),
            BumpUnit::Minor => Version::new(self.major, increment(self.minor)?, 0),
            BumpUnit::Patch => Version::new(self.major, self.minor, increment(self.patch)?),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which version segment to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpUnit {
    Major,
    Minor,
    #[default]
    Patch,
}

impl FromStr for BumpUnit {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        // x/y/z are the segment names older release scripts used
        match s {
            "major" | "x" => Ok(BumpUnit::Major),
            "minor" | "y" => Ok(BumpUnit::Minor),
            "patch" | "z" => Ok(BumpUnit::Patch),
            other => Err(ReleaseError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for BumpUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpUnit::Major => "major",
            BumpUnit::Minor => "minor",
            BumpUnit::Patch => "patch",
        };
        f.write_str(name)
    }
}
