use crate::error::{GitrelError, Result};
use git2::build::CheckoutBuilder;
use git2::{BranchType, Cred, CredentialType, ErrorCode, RemoteCallbacks, Repository as Git2Repo};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

const REMOTES_PREFIX: &str = "remotes/";
const CHECKOUT_REFLOG_PREFIX: &str = "checkout: moving from ";
const MAX_CREDENTIAL_ATTEMPTS: usize = 5;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    previous_branch: Mutex<Option<String>>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
            previous_branch: Mutex::new(None),
        }
    }

    fn repo(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember_previous(&self, branch: String) {
        *self
            .previous_branch
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(branch);
    }

    fn take_previous(&self) -> Option<String> {
        self.previous_branch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Shorthand of the branch HEAD points at, `HEAD` when detached
fn head_shorthand(repo: &Git2Repo) -> Result<String> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
        Ok(_) => Ok("HEAD".to_string()),
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD")?;
            let target = head.symbolic_target().unwrap_or("HEAD");
            Ok(target.trim_start_matches("refs/heads/").to_string())
        }
        Err(e) => Err(e.into()),
    }
}

fn switch_to(repo: &Git2Repo, name: &str) -> Result<()> {
    let refname = format!("refs/heads/{}", name);
    let target = repo.revparse_single(&refname)?;

    repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
    repo.set_head(&refname)?;
    Ok(())
}

/// Previous branch from the most recent "checkout: moving from A to B" HEAD reflog entry
fn previous_from_reflog(repo: &Git2Repo) -> Result<Option<String>> {
    let reflog = repo.reflog("HEAD")?;

    let previous = reflog.iter().find_map(|entry| {
        let message = entry.message()?;
        let moves = message.strip_prefix(CHECKOUT_REFLOG_PREFIX)?;
        let (from, _to) = moves.split_once(" to ")?;
        Some(from.to_string())
    });

    Ok(previous)
}

/// Expand `local` or `local:remote` into a fully-qualified push refspec
fn push_refspec(refspec: &str) -> String {
    let (local, remote) = refspec.split_once(':').unwrap_or((refspec, refspec));
    format!("refs/heads/{}:refs/heads/{}", local, remote)
}

/// Authentication through SSH keys from ~/.ssh/, the SSH agent, git's
/// credential helpers, then libgit2 defaults.
fn remote_callbacks(config: &git2::Config) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn list_all_branches(&self) -> Result<Vec<String>> {
        let repo = self.repo();
        let mut names = Vec::new();

        for entry in repo.branches(None)? {
            let (branch, kind) = entry?;
            // origin/HEAD and friends
            if branch.get().symbolic_target().is_some() {
                continue;
            }

            let Some(name) = branch.name()? else {
                continue;
            };

            match kind {
                BranchType::Local => names.push(name.to_string()),
                BranchType::Remote => names.push(format!("{}{}", REMOTES_PREFIX, name)),
            }
        }

        Ok(names)
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        let repo = self.repo();
        let (short, kind) = match name.strip_prefix(REMOTES_PREFIX) {
            Some(remote) => (remote, BranchType::Remote),
            None => (name, BranchType::Local),
        };

        let exists = match repo.find_branch(short, kind) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        };
        exists
    }

    fn checkout(&self, name: &str) -> Result<()> {
        let repo = self.repo();
        let previous = head_shorthand(&repo)?;

        debug!(from = %previous, to = name, "checking out branch");
        switch_to(&repo, name)?;
        self.remember_previous(previous);
        Ok(())
    }

    fn create_and_switch(&self, name: &str) -> Result<()> {
        let repo = self.repo();
        let previous = head_shorthand(&repo)?;
        let head_commit = repo.head()?.peel_to_commit()?;

        debug!(branch = name, at = %head_commit.id(), "creating branch");
        repo.branch(name, &head_commit, false)?;
        switch_to(&repo, name)?;
        self.remember_previous(previous);
        Ok(())
    }

    fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()> {
        let repo = self.repo();

        let (start, kind) = match start_point.strip_prefix(REMOTES_PREFIX) {
            Some(remote) => (remote, BranchType::Remote),
            None => (start_point, BranchType::Local),
        };
        let start_branch = repo.find_branch(start, kind)?;
        let commit = start_branch.get().peel_to_commit()?;

        debug!(branch = name, start_point, "creating branch from start point");
        let mut branch = repo.branch(name, &commit, false)?;
        if kind == BranchType::Remote {
            branch.set_upstream(Some(start))?;
        }
        Ok(())
    }

    fn switch_back(&self) -> Result<()> {
        let repo = self.repo();
        let previous = match self.take_previous() {
            Some(previous) => previous,
            None => previous_from_reflog(&repo)?.ok_or_else(|| {
                GitrelError::external("no previous branch to switch back to")
            })?,
        };

        let current = head_shorthand(&repo)?;
        debug!(from = %current, to = %previous, "switching back");
        switch_to(&repo, &previous)?;
        self.remember_previous(current);
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        let repo = self.repo();
        let config = repo.config()?;
        let mut remote_handle = repo.find_remote(remote)?;

        let mut callbacks = remote_callbacks(&config);
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "failed to push {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let full_refspec = push_refspec(refspec);
        debug!(remote, refspec = %full_refspec, "pushing");
        remote_handle.push(&[full_refspec.as_str()], Some(&mut push_options))?;
        Ok(())
    }

    fn merge(&self, branch: &str) -> Result<()> {
        let repo = self.repo();
        let their_ref = repo.find_reference(&format!("refs/heads/{}", branch))?;
        let theirs = repo.reference_to_annotated_commit(&their_ref)?;
        let (analysis, _) = repo.merge_analysis(&[&theirs])?;

        if analysis.is_up_to_date() {
            debug!(branch, "already up to date");
            return Ok(());
        }

        if analysis.is_fast_forward() {
            debug!(branch, "fast-forwarding");
            let target = repo.find_object(theirs.id(), None)?;
            repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
            repo.head()?
                .set_target(theirs.id(), &format!("merge {}: Fast-forward", branch))?;
            return Ok(());
        }

        debug!(branch, "creating merge commit");
        repo.merge(&[&theirs], None, None)?;

        let mut index = repo.index()?;
        if index.has_conflicts() {
            return Err(GitrelError::external(format!(
                "automatic merge of {} failed; fix conflicts and then commit the result",
                branch
            )));
        }

        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = repo.signature()?;
        let ours = repo.head()?.peel_to_commit()?;
        let their_commit = repo.find_commit(theirs.id())?;

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &format!("Merge branch '{}'", branch),
            &tree,
            &[&ours, &their_commit],
        )?;
        repo.cleanup_state()?;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        head_shorthand(&self.repo())
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo().remotes()?;

        Ok(remotes.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        let repo = self.repo();
        let config = repo.config()?;
        let mut remote_handle = repo.find_remote(remote)?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks(&config));

        let refspec = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        debug!(remote, %refspec, "fetching");
        remote_handle.fetch(&[refspec.as_str()], Some(&mut fetch_options), None)?;
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let repo = self.repo();
        let mut options = git2::StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}
