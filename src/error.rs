use thiserror::Error;

/// Unified error type for gitrel operations
#[derive(Error, Debug)]
pub enum GitrelError {
    #[error("invalid version format. please use semantic versioning (e.g., 1.0.0, 1.2.3-alpha, 2.0.0+build.1)")]
    InvalidVersionFormat(String),

    #[error("branch {0} already exists")]
    BranchAlreadyExists(String),

    #[error("no release branches found matching prefix: {0}")]
    NoMatchingRelease(String),

    #[error("you have uncommitted changes. please commit or stash them before updating")]
    UncommittedChanges,

    #[error("multiple remotes found, please specify one")]
    AmbiguousRemote,

    #[error("no remotes found")]
    NoRemote,

    #[error("version {0} cannot be incremented further")]
    VersionOverflow(String),

    #[error("invalid branch name pattern '{0}': expected exactly one %v placeholder")]
    InvalidPattern(String),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("{0}")]
    External(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitrel
pub type Result<T> = std::result::Result<T, GitrelError>;

impl GitrelError {
    /// Create an external command failure carrying the underlying message
    pub fn external(msg: impl Into<String>) -> Self {
        GitrelError::External(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitrelError::Config(msg.into())
    }

    /// True for failures reported by the repository collaborator
    pub fn is_external(&self) -> bool {
        matches!(self, GitrelError::Git(_) | GitrelError::External(_))
    }
}
