//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations
//! gitrel needs, allowing for a real repository implementation and an
//! in-memory one for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation that records every
//!   mutating call as a [mock::SideEffect]
//!
//! # Usage
//!
//! Release logic depends on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use gitrel::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitrel::Result<()> {
//! let branches = repo.list_all_branches()?;
//! let current = repo.current_branch()?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockRepository, SideEffect};
pub use repository::Git2Repository;

use crate::error::Result;

/// Version control operations used by release management
///
/// Branch names follow `git branch -a` naming: local branches are bare
/// (`release/1.0.0`), remote-tracking branches are prefixed with
/// `remotes/<remote>/` (`remotes/origin/release/1.0.0`).
///
/// ## Error Handling
///
/// Every method may fail. Implementations map their underlying errors to
/// [crate::error::GitrelError::Git] or [crate::error::GitrelError::External].
pub trait Repository: Send + Sync {
    /// List every local and remote-tracking branch
    fn list_all_branches(&self) -> Result<Vec<String>>;

    /// Check whether a branch exists (local, or `remotes/...` for remote-tracking)
    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// Switch to an existing local branch
    fn checkout(&self, name: &str) -> Result<()>;

    /// Create a branch at HEAD and switch to it
    fn create_and_switch(&self, name: &str) -> Result<()>;

    /// Create a local branch at `start_point` (a remote-tracking branch),
    /// tracking it as upstream. Does not switch.
    fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()>;

    /// Switch back to the previously checked-out branch
    fn switch_back(&self) -> Result<()>;

    /// Push a refspec (`local` or `local:remote`) to a remote
    fn push(&self, remote: &str, refspec: &str) -> Result<()>;

    /// Merge a local branch into the current branch
    fn merge(&self, branch: &str) -> Result<()>;

    /// Name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> Result<String>;

    /// Names of the configured remotes
    fn list_remotes(&self) -> Result<Vec<String>>;

    /// Fetch all branches of a remote
    fn fetch(&self, remote: &str) -> Result<()>;

    /// True when the working tree or index has changes, untracked files included
    fn has_uncommitted_changes(&self) -> Result<bool>;
}
