use super::Context;
use crate::domain::{resolve_exact, validate_version, ReleaseSelector};
use crate::error::{GitrelError, Result};
use crate::git::Repository;
use tracing::info;

impl<R: Repository> Context<'_, R> {
    /// Merge the current branch into a release branch, push it, and return.
    ///
    /// Refuses to start with uncommitted changes. The version must name an
    /// existing release exactly; `latest` picks the highest one.
    pub fn update(&mut self, selector: &ReleaseSelector) -> Result<()> {
        if self.repo.has_uncommitted_changes()? {
            return Err(GitrelError::UncommittedChanges);
        }

        if let ReleaseSelector::Version(version) = selector {
            if !validate_version(version) {
                return Err(GitrelError::InvalidVersionFormat(version.clone()));
            }
        }

        let releases = self.load_releases()?;
        let release = resolve_exact(&releases, selector)?;
        let version = release.version.as_str();

        let options = self.options;
        let local = options.local_branch(version);
        let remote_branch = options.remote_branch(version);
        let previous = self.repo.current_branch()?;

        info!(branch = %local, from = %previous, "updating release");
        self.say(format!("Checking out {}...", local));
        self.ensure_local_branch(release, &local)?;
        self.repo.checkout(&local)?;

        self.say(format!("Merging {} into {}...", previous, local));
        self.repo.merge(&previous)?;

        self.push_release(&local, &remote_branch)?;

        self.repo.checkout(&previous)?;
        self.say(format!("Switched back to branch: {}", previous));
        Ok(())
    }
}
