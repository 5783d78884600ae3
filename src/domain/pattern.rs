use crate::error::{GitrelError, Result};
use std::fmt;

/// Placeholder marking where the version sits in a branch name pattern
pub const VERSION_PLACEHOLDER: &str = "%v";

/// Default naming pattern for both local and remote release branches
pub const DEFAULT_BRANCH_PATTERN: &str = "release/%v";

/// Branch naming pattern (e.g. "release/%v", "v/%v")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPattern {
    pattern: String,
}

impl BranchPattern {
    /// Create a pattern, requiring exactly one `%v` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches(VERSION_PLACEHOLDER).count() != 1 {
            return Err(GitrelError::InvalidPattern(pattern));
        }

        Ok(BranchPattern { pattern })
    }

    /// Pattern for remote-tracking refs as listed by `git branch -a`:
    /// `remotes/<remote>/<pattern>`
    pub fn remote_tracking(remote: &str, remote_pattern: &BranchPattern) -> Self {
        BranchPattern {
            pattern: format!("remotes/{}/{}", remote, remote_pattern.pattern),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Format a version according to the pattern
    /// Example: pattern="release/%v", version="1.2.3" -> "release/1.2.3"
    pub fn format(&self, version: &str) -> String {
        format_branch_name(&self.pattern, version)
    }

    /// Extract the text occupying the placeholder, if `branch` fits the pattern
    pub fn extract<'b>(&self, branch: &'b str) -> Option<&'b str> {
        extract_version(branch, &self.pattern)
    }
}

impl Default for BranchPattern {
    fn default() -> Self {
        BranchPattern {
            pattern: DEFAULT_BRANCH_PATTERN.to_string(),
        }
    }
}

impl fmt::Display for BranchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Substitute `version` into the pattern's placeholder
pub fn format_branch_name(pattern: &str, version: &str) -> String {
    pattern.replacen(VERSION_PLACEHOLDER, version, 1)
}

/// Inverse of [`format_branch_name`].
///
/// Purely textual: the branch must start with the literal text before the
/// placeholder and end with the literal text after it, and something must be
/// left in between. Patterns without exactly one placeholder never match.
pub fn extract_version<'b>(branch: &'b str, pattern: &str) -> Option<&'b str> {
    let mut parts = pattern.split(VERSION_PLACEHOLDER);
    let (prefix, suffix) = match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(suffix), None) => (prefix, suffix),
        _ => return None,
    };

    if branch.len() <= prefix.len() + suffix.len() {
        return None;
    }

    let version = branch.strip_prefix(prefix)?.strip_suffix(suffix)?;
    Some(version)
}
