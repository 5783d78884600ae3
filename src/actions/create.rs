use super::Context;
use crate::domain::{highest_version, next_release_version, validate_version, VersionBump};
use crate::error::{GitrelError, Result};
use crate::git::Repository;
use tracing::{debug, info};

impl<R: Repository> Context<'_, R> {
    /// Create, push and leave a new release branch.
    ///
    /// Fails before touching the repository when the version is invalid or a
    /// local or remote-tracking branch for it already exists.
    pub fn create(&mut self, version: &str) -> Result<()> {
        if !validate_version(version) {
            return Err(GitrelError::InvalidVersionFormat(version.to_string()));
        }

        self.fetch_once()?;

        let options = self.options;
        let local = options.local_branch(version);
        let remote_branch = options.remote_branch(version);

        if self.repo.branch_exists(&local)?
            || self
                .repo
                .branch_exists(&options.remote_tracking_branch(version))?
        {
            return Err(GitrelError::BranchAlreadyExists(local));
        }

        info!(branch = %local, "creating release branch");
        self.repo.create_and_switch(&local)?;
        self.say(format!("Created new release branch: {}", local));

        self.push_release(&local, &remote_branch)?;

        self.repo.switch_back()?;
        let back = self.repo.current_branch()?;
        self.say(format!("Switched back to branch: {}", back));
        Ok(())
    }

    /// Create the release following the highest existing one
    pub fn increment(&mut self, bump: VersionBump) -> Result<()> {
        let releases = self.load_releases()?;
        let base = highest_version(&releases);
        let version = next_release_version(base, bump)?;

        debug!(%base, %bump, next = %version, "computed next release");
        self.create(&version)
    }
}
