use super::Context;
use crate::domain::ReleaseInfo;
use crate::error::Result;
use crate::git::Repository;

impl<R: Repository> Context<'_, R> {
    /// Print every release, oldest first, flagging those with no remote branch
    pub fn list(&mut self) -> Result<Vec<ReleaseInfo>> {
        let releases = self.load_releases()?;

        if releases.is_empty() {
            self.say("No release branches found.");
            return Ok(releases);
        }

        self.say("Current release branches:");
        for release in &releases {
            if release.is_local_only() {
                self.say(format!("{} (local only)", release.version));
            } else {
                self.say(release.version.as_str());
            }
        }

        Ok(releases)
    }
}
