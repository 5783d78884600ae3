//! Command-line surface.

pub mod orchestration;

use crate::options::OptionOverrides;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(
    name = "gitrel",
    version,
    about = "Manage release branches named after semantic versions"
)]
pub struct Args {
    #[arg(
        long,
        global = true,
        help = "Remote to fetch from and push to (detected when only one exists)"
    )]
    pub remote: Option<String>,

    #[arg(
        long,
        global = true,
        conflicts_with = "no_fetch",
        help = "Fetch from the remote before reading branches"
    )]
    pub fetch: bool,

    #[arg(long, global = true, help = "Do not fetch, even if the config enables it")]
    pub no_fetch: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATTERN",
        help = "Local release branch naming pattern, %v marks the version [default: release/%v]"
    )]
    pub local_branch_name: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "PATTERN",
        help = "Remote release branch naming pattern, %v marks the version [default: release/%v]"
    )]
    pub remote_branch_name: Option<String>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Per-invocation option overrides given on the command line
    pub fn overrides(&self) -> OptionOverrides {
        let fetch = if self.fetch {
            Some(true)
        } else if self.no_fetch {
            Some(false)
        } else {
            None
        };

        OptionOverrides {
            remote: self.remote.clone(),
            fetch,
            local_branch_name: self.local_branch_name.clone(),
            remote_branch_name: self.remote_branch_name.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "List current release branches")]
    List,

    #[command(about = "Create a new release branch from an explicit version or by incrementing the latest")]
    New {
        #[arg(value_name = "VERSION|major|minor|patch")]
        target: String,
    },

    #[command(about = "Checkout the latest release branch matching a version prefix")]
    Checkout {
        #[arg(value_name = "PREFIX|latest")]
        target: String,
    },

    #[command(about = "Merge the current branch into a release branch and push it")]
    Update {
        #[arg(value_name = "VERSION|latest")]
        target: String,
    },

    #[command(about = "Alias for `gitrel update latest`")]
    Push,

    #[command(about = "Show the current version and the releases around it")]
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let args = Args::try_parse_from([
            "gitrel",
            "new",
            "minor",
            "--remote",
            "upstream",
            "--local-branch-name",
            "v/%v",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::New {
                target: "minor".to_string()
            }
        );
        let overrides = args.overrides();
        assert_eq!(overrides.remote.as_deref(), Some("upstream"));
        assert_eq!(overrides.local_branch_name.as_deref(), Some("v/%v"));
        assert_eq!(overrides.fetch, None);
    }

    #[test]
    fn test_fetch_flags() {
        let args = Args::try_parse_from(["gitrel", "--fetch", "status"]).unwrap();
        assert_eq!(args.overrides().fetch, Some(true));

        let args = Args::try_parse_from(["gitrel", "status", "--no-fetch"]).unwrap();
        assert_eq!(args.overrides().fetch, Some(false));
    }

    #[test]
    fn test_fetch_and_no_fetch_conflict() {
        let err = Args::try_parse_from(["gitrel", "--fetch", "--no-fetch", "list"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["gitrel"]).is_err());
        assert!(Args::try_parse_from(["gitrel", "checkout"]).is_err());
    }

    #[test]
    fn test_push_takes_no_arguments() {
        let args = Args::try_parse_from(["gitrel", "push"]).unwrap();
        assert_eq!(args.command, Command::Push);
        assert!(Args::try_parse_from(["gitrel", "push", "1.0.0"]).is_err());
    }
}
