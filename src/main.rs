//! attic-prune - prune old wiki page revisions
//!
//! Walks `<root>/data/attic` and deletes revision files older than the
//! given number of days.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use attic_prune::Result;
use attic_prune::app::AppContext;
use attic_prune::cli::{Cli, output};
use attic_prune::config::{self, ENV_ROBOT};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if robot_requested(&cli) {
                // Robot mode: JSON error output to stdout
                if output::emit_json(&output::robot_error(&e)).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    attic_prune::cli::prune::run(&ctx)
}

/// `--robot` or a truthy `ATTIC_PRUNE_ROBOT`, checked without failing so
/// configuration errors can still be reported as JSON.
fn robot_requested(cli: &Cli) -> bool {
    cli.robot
        || config::env_bool(&|key: &str| std::env::var(key).ok(), ENV_ROBOT)
            .ok()
            .flatten()
            .unwrap_or(false)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,attic_prune=error",
        1 => "info,attic_prune=debug",
        2 => "debug,attic_prune=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if robot_requested(cli) {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
