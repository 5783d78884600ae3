//! Release selection and the windowed status view.

use crate::domain::pattern::BranchPattern;
use crate::domain::release::ReleaseInfo;
use crate::domain::version::{SemanticVersion, VersionBump};
use crate::error::{GitrelError, Result};
use std::fmt;

/// Command-line token selecting the highest release
pub const LATEST: &str = "latest";

/// Version shown for the increment base when no release exists yet
pub const NO_RELEASE_VERSION: &str = "0.0.0";

/// What the user asked for: the latest release, or a version (prefix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseSelector {
    Latest,
    Version(String),
}

impl ReleaseSelector {
    pub fn parse(token: &str) -> Self {
        if token == LATEST {
            ReleaseSelector::Latest
        } else {
            ReleaseSelector::Version(token.to_string())
        }
    }

    /// Plain textual prefix test; `latest` matches everything
    pub fn matches_prefix(&self, version: &str) -> bool {
        match self {
            ReleaseSelector::Latest => true,
            ReleaseSelector::Version(prefix) => version.starts_with(prefix.as_str()),
        }
    }
}

impl From<&str> for ReleaseSelector {
    fn from(token: &str) -> Self {
        ReleaseSelector::parse(token)
    }
}

impl fmt::Display for ReleaseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseSelector::Latest => f.write_str(LATEST),
            ReleaseSelector::Version(version) => f.write_str(version),
        }
    }
}

fn greatest<'r>(releases: impl Iterator<Item = &'r ReleaseInfo>) -> Option<&'r ReleaseInfo> {
    releases.max_by(|a, b| a.version.precedence_cmp(&b.version))
}

/// Highest release whose version starts with the selector's text.
///
/// `"1.3"` picks `1.3.10` over `1.3.9`, and would also accept `1.30.0`:
/// the match is on characters, not on dotted segments.
pub fn resolve_release<'r>(
    releases: &'r [ReleaseInfo],
    selector: &ReleaseSelector,
) -> Result<&'r ReleaseInfo> {
    greatest(
        releases
            .iter()
            .filter(|release| selector.matches_prefix(release.version.as_str())),
    )
    .ok_or_else(|| GitrelError::NoMatchingRelease(selector.to_string()))
}

/// Release whose version string equals the selector exactly, or the highest
/// release for `latest`
pub fn resolve_exact<'r>(
    releases: &'r [ReleaseInfo],
    selector: &ReleaseSelector,
) -> Result<&'r ReleaseInfo> {
    let found = match selector {
        ReleaseSelector::Latest => greatest(releases.iter()),
        ReleaseSelector::Version(version) => releases
            .iter()
            .find(|release| release.version.as_str() == version),
    };

    found.ok_or_else(|| GitrelError::NoMatchingRelease(selector.to_string()))
}

/// Version embedded in the checked-out branch name, trying the local pattern
/// before the remote one. The extracted text is trusted as-is.
pub fn current_version_from_branch(
    current_branch: &str,
    local: &BranchPattern,
    remote: &BranchPattern,
) -> Option<String> {
    local
        .extract(current_branch)
        .or_else(|| remote.extract(current_branch))
        .map(str::to_string)
}

/// Base for the next increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBase<'r> {
    /// No release exists yet (rendered as `0.0.0`)
    NoRelease,
    Release(&'r SemanticVersion),
}

impl fmt::Display for VersionBase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBase::NoRelease => f.write_str(NO_RELEASE_VERSION),
            VersionBase::Release(version) => write!(f, "{}", version),
        }
    }
}

pub fn highest_version(releases: &[ReleaseInfo]) -> VersionBase<'_> {
    match greatest(releases.iter()) {
        Some(release) => VersionBase::Release(&release.version),
        None => VersionBase::NoRelease,
    }
}

/// Version to create for an increment request.
///
/// The very first release is `1.0.0` for a major bump, `0.0.1` for a patch
/// bump and `0.1.0` otherwise.
pub fn next_release_version(base: VersionBase<'_>, bump: VersionBump) -> Result<String> {
    match base {
        VersionBase::NoRelease => Ok(match bump {
            VersionBump::Major => "1.0.0".to_string(),
            VersionBump::Patch => "0.0.1".to_string(),
            _ => "0.1.0".to_string(),
        }),
        VersionBase::Release(version) => Ok(version.increment(bump)?.to_string()),
    }
}

/// Marker attached to a release in the status view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    Latest,
    Current,
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTag::Latest => write!(f, "latest"),
            StatusTag::Current => write!(f, "current"),
        }
    }
}

/// One line of the windowed status view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Release { version: String, tags: Vec<StatusTag> },
    /// Stands for one or more consecutive hidden releases
    Elided,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Release { version, tags } if tags.is_empty() => f.write_str(version),
            StatusLine::Release { version, tags } => {
                let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
                write!(f, "{} ({})", version, tags.join(", "))
            }
            StatusLine::Elided => f.write_str("..."),
        }
    }
}

/// Windowed view of all releases, newest first.
///
/// A release is shown when it is tagged (latest/current) or sits right next
/// to a tagged release; every run of hidden releases collapses into a single
/// [`StatusLine::Elided`].
pub fn render_status(
    releases: &[ReleaseInfo],
    current_version: Option<&str>,
    latest_version: &str,
) -> Vec<StatusLine> {
    let tagged: Vec<(&str, Vec<StatusTag>)> = releases
        .iter()
        .rev()
        .map(|release| {
            let version = release.version.as_str();
            let mut tags = Vec::new();
            if version == latest_version {
                tags.push(StatusTag::Latest);
            }
            if current_version == Some(version) {
                tags.push(StatusTag::Current);
            }
            (version, tags)
        })
        .collect();

    let has_tag = |idx: usize| tagged.get(idx).is_some_and(|(_, tags)| !tags.is_empty());

    let mut lines = Vec::new();
    for (idx, (version, tags)) in tagged.iter().enumerate() {
        let visible = !tags.is_empty() || (idx > 0 && has_tag(idx - 1)) || has_tag(idx + 1);

        if visible {
            lines.push(StatusLine::Release {
                version: version.to_string(),
                tags: tags.clone(),
            });
        } else if lines.last() != Some(&StatusLine::Elided) {
            lines.push(StatusLine::Elided);
        }
    }

    lines
}
