use crate::error::{GitrelError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$")
        .expect("semver pattern compiles")
});

/// Semantic version as found in a release branch name.
///
/// Keeps the exact text it was parsed from so that branch names can be
/// rebuilt byte-for-byte (e.g. `01.2.3` stays `01.2.3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
    text: String,
}

/// Which component of a version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl SemanticVersion {
    /// Create a plain `major.minor.patch` version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
            text: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// Parse `major.minor.patch[-prerelease][+build]`.
    ///
    /// Components that do not fit in a `u64` are rejected like any other
    /// malformed input.
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = || GitrelError::InvalidVersionFormat(version.to_string());

        let caps = SEMVER_PATTERN.captures(version).ok_or_else(invalid)?;
        let number = |idx: usize| caps[idx].parse::<u64>().map_err(|_| invalid());

        Ok(SemanticVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
            text: version.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The numeric `(major, minor, patch)` triple
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Release ordering: numeric triple only.
    ///
    /// Pre-release and build metadata never take part, so `1.0.0-beta.1` and
    /// `1.0.0` are equivalent. This deviates from SemVer 2.0 precedence.
    pub fn precedence_cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }

    /// Bump one component, resetting the lower ones. Pre-release and build
    /// metadata are always dropped.
    ///
    /// Fails with [GitrelError::VersionOverflow] when the bumped component is
    /// already `u64::MAX`.
    pub fn increment(&self, bump: VersionBump) -> Result<Self> {
        let overflow = || GitrelError::VersionOverflow(self.text.clone());

        let next = match bump {
            VersionBump::Major => {
                SemanticVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => SemanticVersion::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for SemanticVersion {
    type Err = GitrelError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl FromStr for VersionBump {
    type Err = GitrelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(GitrelError::InvalidVersionFormat(other.to_string())),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// Check whether a string is a usable semantic version
pub fn validate_version(version: &str) -> bool {
    SemanticVersion::parse(version).is_ok()
}

/// Lenient numeric triple: text before any `-`/`+`, first three dot-separated
/// fields, non-numeric fields counting as zero.
fn numeric_triple(version: &str) -> (u64, u64, u64) {
    let core = version.split(['-', '+']).next().unwrap_or_default();
    let mut fields = core
        .split('.')
        .map(|field| field.parse::<u64>().unwrap_or(0));

    (
        fields.next().unwrap_or(0),
        fields.next().unwrap_or(0),
        fields.next().unwrap_or(0),
    )
}

/// Order two version strings by major, then minor, then patch.
///
/// Equal triples compare `Equal` whatever their pre-release or build text,
/// which keeps this a strict weak ordering usable as a sort key.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    numeric_triple(a).cmp(&numeric_triple(b))
}

/// True if `a` orders strictly before `b`
pub fn version_less_than(a: &str, b: &str) -> bool {
    compare_versions(a, b) == Ordering::Less
}

/// Increment a previously validated version string
pub fn increment_version(version: &str, bump: VersionBump) -> Result<String> {
    Ok(SemanticVersion::parse(version)?.increment(bump)?.to_string())
}
