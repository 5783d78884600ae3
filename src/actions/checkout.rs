use super::Context;
use crate::domain::{resolve_release, ReleaseSelector};
use crate::error::Result;
use crate::git::Repository;
use tracing::info;

impl<R: Repository> Context<'_, R> {
    /// Switch to the highest release matching a version prefix (or the latest)
    pub fn checkout(&mut self, selector: &ReleaseSelector) -> Result<()> {
        let releases = self.load_releases()?;
        let release = resolve_release(&releases, selector)?;
        let local = self.options.local_branch(release.version.as_str());

        info!(%selector, branch = %local, "checking out release");
        self.say(format!("Checking out release branch: {}", local));
        self.ensure_local_branch(release, &local)?;
        self.repo.checkout(&local)?;
        Ok(())
    }
}
