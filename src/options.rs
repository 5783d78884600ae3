//! Per-invocation command options.

use crate::config::Config;
use crate::domain::BranchPattern;
use crate::error::{GitrelError, Result};
use crate::git::Repository;
use std::cell::Cell;
use tracing::debug;

/// Values given on the command line for this invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub remote: Option<String>,
    pub fetch: Option<bool>,
    pub local_branch_name: Option<String>,
    pub remote_branch_name: Option<String>,
}

/// Options shared by every operation of one invocation.
///
/// Resolved once at start-up and passed by reference. The only mutable part is
/// the `fetched` flag, which keeps composed operations from fetching twice.
#[derive(Debug)]
pub struct CommandOptions {
    pub fetch: bool,
    pub remote: String,
    pub local_pattern: BranchPattern,
    pub remote_pattern: BranchPattern,
    fetched: Cell<bool>,
}

/// First value that is present and non-empty
fn first_non_empty(candidates: [Option<&str>; 2]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// The single configured remote
fn detect_remote<R: Repository>(repo: &R) -> Result<String> {
    let mut remotes = repo.list_remotes()?;

    match remotes.len() {
        0 => Err(GitrelError::NoRemote),
        1 => Ok(remotes.remove(0)),
        _ => Err(GitrelError::AmbiguousRemote),
    }
}

fn resolve_pattern(override_value: Option<&str>, configured: Option<&str>) -> Result<BranchPattern> {
    match first_non_empty([override_value, configured]) {
        Some(pattern) => BranchPattern::new(pattern),
        None => Ok(BranchPattern::default()),
    }
}

impl CommandOptions {
    pub fn new(
        fetch: bool,
        remote: impl Into<String>,
        local_pattern: BranchPattern,
        remote_pattern: BranchPattern,
    ) -> Self {
        CommandOptions {
            fetch,
            remote: remote.into(),
            local_pattern,
            remote_pattern,
            fetched: Cell::new(false),
        }
    }

    /// Resolve each option from the override, then the config file, then the
    /// built-in default. The remote is auto-detected only when neither names one.
    pub fn resolve<R: Repository>(
        overrides: &OptionOverrides,
        config: &Config,
        repo: &R,
    ) -> Result<Self> {
        let local_pattern = resolve_pattern(
            overrides.local_branch_name.as_deref(),
            config.local_branch_name.as_deref(),
        )?;
        let remote_pattern = resolve_pattern(
            overrides.remote_branch_name.as_deref(),
            config.remote_branch_name.as_deref(),
        )?;
        let fetch = overrides.fetch.or(config.fetch).unwrap_or(false);

        let remote = match first_non_empty([overrides.remote.as_deref(), config.remote.as_deref()])
        {
            Some(remote) => remote,
            None => detect_remote(repo)?,
        };

        debug!(
            %remote,
            fetch,
            local = %local_pattern,
            remote_pattern = %remote_pattern,
            "resolved command options"
        );
        Ok(CommandOptions::new(fetch, remote, local_pattern, remote_pattern))
    }

    /// Remote-tracking form of the remote pattern (`remotes/<remote>/<pattern>`)
    pub fn remote_tracking_pattern(&self) -> BranchPattern {
        BranchPattern::remote_tracking(&self.remote, &self.remote_pattern)
    }

    pub fn local_branch(&self, version: &str) -> String {
        self.local_pattern.format(version)
    }

    pub fn remote_branch(&self, version: &str) -> String {
        self.remote_pattern.format(version)
    }

    /// Remote-tracking ref name for a version (`remotes/<remote>/<branch>`)
    pub fn remote_tracking_branch(&self, version: &str) -> String {
        self.remote_tracking_pattern().format(version)
    }

    pub fn has_fetched(&self) -> bool {
        self.fetched.get()
    }

    pub(crate) fn mark_fetched(&self) {
        self.fetched.set(true);
    }
}

impl Default for CommandOptions {
    fn default() -> Self {
        CommandOptions::new(
            false,
            "origin",
            BranchPattern::default(),
            BranchPattern::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_defaults_with_single_remote() {
        let repo = MockRepository::new().with_remotes(["upstream"]);
        let options =
            CommandOptions::resolve(&OptionOverrides::default(), &Config::default(), &repo)
                .unwrap();

        assert_eq!(options.remote, "upstream");
        assert!(!options.fetch);
        assert_eq!(options.local_pattern.as_str(), "release/%v");
        assert_eq!(options.remote_pattern.as_str(), "release/%v");
        assert!(!options.has_fetched());
    }

    #[test]
    fn test_override_beats_config() {
        let repo = MockRepository::new();
        let overrides = OptionOverrides {
            remote: Some("fork".to_string()),
            fetch: Some(false),
            local_branch_name: Some("v/%v".to_string()),
            remote_branch_name: None,
        };
        let config = Config {
            fetch: Some(true),
            remote: Some("origin".to_string()),
            local_branch_name: Some("rel/%v".to_string()),
            remote_branch_name: Some("rel/%v".to_string()),
        };

        let options = CommandOptions::resolve(&overrides, &config, &repo).unwrap();

        assert_eq!(options.remote, "fork");
        assert!(!options.fetch);
        assert_eq!(options.local_pattern.as_str(), "v/%v");
        assert_eq!(options.remote_pattern.as_str(), "rel/%v");
    }

    #[test]
    fn test_empty_override_falls_through() {
        let repo = MockRepository::new();
        let overrides = OptionOverrides {
            remote: Some(String::new()),
            local_branch_name: Some(String::new()),
            ..OptionOverrides::default()
        };
        let config = Config {
            remote: Some("upstream".to_string()),
            ..Config::default()
        };

        let options = CommandOptions::resolve(&overrides, &config, &repo).unwrap();

        assert_eq!(options.remote, "upstream");
        assert_eq!(options.local_pattern, BranchPattern::default());
    }

    #[test]
    fn test_remote_detection_errors() {
        let none = MockRepository::new().with_remotes(Vec::<String>::new());
        let err = CommandOptions::resolve(&OptionOverrides::default(), &Config::default(), &none)
            .unwrap_err();
        assert!(matches!(err, GitrelError::NoRemote));

        let many = MockRepository::new().with_remotes(["origin", "upstream"]);
        let err = CommandOptions::resolve(&OptionOverrides::default(), &Config::default(), &many)
            .unwrap_err();
        assert!(matches!(err, GitrelError::AmbiguousRemote));
    }

    #[test]
    fn test_explicit_remote_skips_detection() {
        let many = MockRepository::new().with_remotes(["origin", "upstream"]);
        let overrides = OptionOverrides {
            remote: Some("upstream".to_string()),
            ..OptionOverrides::default()
        };

        let options = CommandOptions::resolve(&overrides, &Config::default(), &many).unwrap();
        assert_eq!(options.remote, "upstream");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let repo = MockRepository::new();
        let overrides = OptionOverrides {
            remote_branch_name: Some("release".to_string()),
            ..OptionOverrides::default()
        };

        let err = CommandOptions::resolve(&overrides, &Config::default(), &repo).unwrap_err();
        assert!(matches!(err, GitrelError::InvalidPattern(_)));
    }

    #[test]
    fn test_branch_name_helpers() {
        let options = CommandOptions::new(
            false,
            "origin",
            BranchPattern::new("v/%v").unwrap(),
            BranchPattern::default(),
        );

        assert_eq!(options.local_branch("1.1.0"), "v/1.1.0");
        assert_eq!(options.remote_branch("1.1.0"), "release/1.1.0");
        assert_eq!(
            options.remote_tracking_branch("1.1.0"),
            "remotes/origin/release/1.1.0"
        );
    }

    #[test]
    fn test_fetched_flag() {
        let options = CommandOptions::default();
        assert!(!options.has_fetched());
        options.mark_fetched();
        assert!(options.has_fetched());
    }
}
