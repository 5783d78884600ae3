//! Domain logic - pure release rules independent of git operations

pub mod pattern;
pub mod release;
pub mod selection;
pub mod version;

pub use pattern::{extract_version, format_branch_name, BranchPattern};
pub use release::{build_releases, BranchKind, ReleaseBranch, ReleaseInfo};
pub use selection::{
    current_version_from_branch, highest_version, next_release_version, render_status,
    resolve_exact, resolve_release, ReleaseSelector, StatusLine, StatusTag, VersionBase,
};
pub use version::{
    compare_versions, increment_version, validate_version, version_less_than, SemanticVersion,
    VersionBump,
};
