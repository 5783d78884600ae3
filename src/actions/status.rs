use super::Context;
use crate::domain::{current_version_from_branch, render_status, StatusLine};
use crate::error::Result;
use crate::git::Repository;

impl<R: Repository> Context<'_, R> {
    /// Print the current and latest versions and a windowed list of the rest
    pub fn status(&mut self) -> Result<Vec<StatusLine>> {
        let releases = self.load_releases()?;
        let options = self.options;

        let Some(latest) = releases.last() else {
            self.say("No existing release branches found.");
            self.say(format!("Remote: {}", options.remote));
            return Ok(Vec::new());
        };
        let latest = latest.version.as_str();

        let branch = self.repo.current_branch()?;
        let current =
            current_version_from_branch(&branch, &options.local_pattern, &options.remote_pattern);

        match &current {
            Some(version) => self.say(format!("Current version: {}", version)),
            None => self.say("Current version: (not on a release branch)"),
        }
        self.say(format!("Latest version: {}", latest));
        self.say(format!("Remote: {}", options.remote));
        self.say("Other versions:");

        let lines = render_status(&releases, current.as_deref(), latest);
        for line in &lines {
            self.say(format!(" - {}", line));
        }

        Ok(lines)
    }
}
