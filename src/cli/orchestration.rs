//! Dispatch of parsed commands to release operations
//!
//! Kept apart from argument parsing so the same dispatch can be driven
//! programmatically with any [Repository] and [Output].

use crate::actions::Context;
use crate::cli::Command;
use crate::domain::{ReleaseSelector, VersionBump};
use crate::error::Result;
use crate::git::Repository;
use crate::options::CommandOptions;
use crate::ui::Output;
use tracing::debug;

/// Run one command
///
/// `checkout` always finishes with the status view, even when the checkout
/// itself failed; the checkout error is still returned.
pub fn run<R: Repository>(
    command: &Command,
    repo: &R,
    options: &CommandOptions,
    output: &mut dyn Output,
) -> Result<()> {
    debug!(?command, "running command");
    let mut ctx = Context::new(repo, options, output);

    match command {
        Command::List => ctx.list().map(drop),
        Command::New { target } => match target.parse::<VersionBump>() {
            Ok(bump) => ctx.increment(bump),
            Err(_) => ctx.create(target),
        },
        Command::Checkout { target } => {
            let checkout = ctx.checkout(&ReleaseSelector::parse(target));
            let status = ctx.status();
            checkout?;
            status.map(drop)
        }
        Command::Update { target } => ctx.update(&ReleaseSelector::parse(target)),
        Command::Push => ctx.update(&ReleaseSelector::Latest),
        Command::Status => ctx.status().map(drop),
    }
}
