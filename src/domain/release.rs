//! Grouping of raw branch names into version-sorted releases.

use crate::domain::pattern::BranchPattern;
use crate::domain::version::SemanticVersion;
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

/// Whether a branch is local or a remote-tracking ref
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Local,
    Remote,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKind::Local => write!(f, "local"),
            BranchKind::Remote => write!(f, "remote"),
        }
    }
}

/// One physical branch backing a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub branch_name: String,
    pub kind: BranchKind,
}

/// A version together with every branch that carries it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: SemanticVersion,
    pub branches: Vec<ReleaseBranch>,
}

impl ReleaseInfo {
    pub fn new(version: SemanticVersion) -> Self {
        ReleaseInfo {
            version,
            branches: Vec::new(),
        }
    }

    /// True when no remote-tracking branch has been seen for this version
    pub fn is_local_only(&self) -> bool {
        !self
            .branches
            .iter()
            .any(|branch| branch.kind == BranchKind::Remote)
    }

    pub fn first_local_branch(&self) -> Option<&ReleaseBranch> {
        self.first_of_kind(BranchKind::Local)
    }

    pub fn first_remote_branch(&self) -> Option<&ReleaseBranch> {
        self.first_of_kind(BranchKind::Remote)
    }

    fn first_of_kind(&self, kind: BranchKind) -> Option<&ReleaseBranch> {
        self.branches.iter().find(|branch| branch.kind == kind)
    }
}

/// Classify a branch name. The remote-tracking pattern is tried first so a
/// remote ref is never also counted as local.
fn classify<'b>(
    branch: &'b str,
    remote_tracking: &BranchPattern,
    local: &BranchPattern,
) -> Option<(&'b str, BranchKind)> {
    remote_tracking
        .extract(branch)
        .map(|version| (version, BranchKind::Remote))
        .or_else(|| local.extract(branch).map(|version| (version, BranchKind::Local)))
}

/// Build the ascending list of releases from `git branch -a` style names.
///
/// `remote_tracking` is the full `remotes/<remote>/<pattern>` form. Branches
/// matching neither pattern, or whose extracted text is not a valid version,
/// are skipped. Branches of one version keep their first-seen order.
pub fn build_releases<S: AsRef<str>>(
    branch_names: &[S],
    remote_tracking: &BranchPattern,
    local: &BranchPattern,
) -> Vec<ReleaseInfo> {
    let mut by_version: IndexMap<String, ReleaseInfo> = IndexMap::new();

    for name in branch_names {
        let name = name.as_ref().trim();
        let Some((candidate, kind)) = classify(name, remote_tracking, local) else {
            continue;
        };

        let version = match SemanticVersion::parse(candidate) {
            Ok(version) => version,
            Err(_) => {
                debug!(branch = name, candidate, "skipping branch with invalid version");
                continue;
            }
        };

        debug!(branch = name, %kind, %version, "matched release branch");
        by_version
            .entry(candidate.to_string())
            .or_insert_with(|| ReleaseInfo::new(version))
            .branches
            .push(ReleaseBranch {
                branch_name: name.to_string(),
                kind,
            });
    }

    let mut releases: Vec<ReleaseInfo> = by_version.into_values().collect();
    releases.sort_by(|a, b| a.version.precedence_cmp(&b.version));
    releases
}
