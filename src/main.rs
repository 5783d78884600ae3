use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use gitrel::cli::{orchestration, Args};
use gitrel::config;
use gitrel::git::Git2Repository;
use gitrel::options::CommandOptions;
use gitrel::ui::{self, ConsoleOutput};

/// Diagnostics go to stderr. `RUST_LOG` wins over the default level.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn run(args: &Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("failed to load config")?;

    let repo = Git2Repository::open(".").context("not in a git repository")?;
    let options = CommandOptions::resolve(&args.overrides(), &config, &repo)?;

    let mut output = ConsoleOutput;
    orchestration::run(&args.command, &repo, &options, &mut output)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
