//! Release operations.
//!
//! Each operation is a method on [Context], which bundles the repository,
//! the resolved options and the output sink of one invocation. Validation
//! happens before the first mutating repository call; once mutations start,
//! the first failure aborts the rest and nothing is rolled back.

mod checkout;
mod create;
mod list;
mod status;
mod update;

use crate::domain::{build_releases, ReleaseInfo};
use crate::error::Result;
use crate::git::Repository;
use crate::options::CommandOptions;
use crate::ui::Output;
use tracing::{debug, info};

/// Everything an operation needs for one invocation
pub struct Context<'a, R: Repository> {
    repo: &'a R,
    options: &'a CommandOptions,
    output: &'a mut dyn Output,
}

impl<'a, R: Repository> Context<'a, R> {
    pub fn new(repo: &'a R, options: &'a CommandOptions, output: &'a mut dyn Output) -> Self {
        Context {
            repo,
            options,
            output,
        }
    }

    pub fn options(&self) -> &CommandOptions {
        self.options
    }

    fn say(&mut self, line: impl AsRef<str>) {
        self.output.println(line.as_ref());
    }

    /// Fetch from the remote, at most once per invocation and only when enabled
    fn fetch_once(&mut self) -> Result<()> {
        let options = self.options;
        if !options.fetch || options.has_fetched() {
            return Ok(());
        }

        self.say(format!("Fetching from remote '{}'...", options.remote));
        info!(remote = %options.remote, "fetching");
        self.repo.fetch(&options.remote)?;
        options.mark_fetched();
        Ok(())
    }

    /// Current releases, ascending by version
    pub fn load_releases(&mut self) -> Result<Vec<ReleaseInfo>> {
        self.fetch_once()?;

        let options = self.options;
        let branches = self.repo.list_all_branches()?;
        let releases = build_releases(
            &branches,
            &options.remote_tracking_pattern(),
            &options.local_pattern,
        );

        debug!(
            branches = branches.len(),
            releases = releases.len(),
            "loaded releases"
        );
        Ok(releases)
    }

    /// Make sure a local branch exists for the release, creating it from the
    /// remote-tracking branch when only the remote has it
    fn ensure_local_branch(&mut self, release: &ReleaseInfo, local: &str) -> Result<()> {
        if release.first_local_branch().is_some() {
            return Ok(());
        }

        if let Some(remote) = release.first_remote_branch() {
            debug!(branch = local, start_point = %remote.branch_name, "creating local tracking branch");
            self.repo.create_branch_from(local, &remote.branch_name)?;
        }
        Ok(())
    }

    /// Push `local` to the remote under `remote_branch`
    fn push_release(&mut self, local: &str, remote_branch: &str) -> Result<()> {
        let options = self.options;
        let remote = options.remote.as_str();

        if local == remote_branch {
            self.say(format!("Pushing {} to {}...", local, remote));
            self.repo.push(remote, local)?;
        } else {
            self.say(format!(
                "Pushing {} to {} ({})...",
                local, remote, remote_branch
            ));
            self.repo
                .push(remote, &format!("{}:{}", local, remote_branch))?;
        }

        self.say("Pushed!");
        Ok(())
    }
}
