//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::PruneConfig;
use crate::error::Result;

pub mod output;
pub mod prune;

pub use output::OutputMode;

/// Remove page revisions older than AGE days from a wiki's data/attic
/// directory.
///
/// The wiki keeps its change log in data/meta/*.changes, which is left
/// untouched, so pruned revisions may still be listed as old revisions.
#[derive(Parser, Debug)]
#[command(name = "attic-prune", version, about, long_about)]
pub struct Cli {
    /// Maximum age in days; revisions older than this are deleted
    #[arg(value_name = "AGE")]
    pub age: u32,

    /// Wiki root directory (must contain a data/attic dir), uses the current
    /// working directory if omitted
    #[arg(short = 'd', long = "dir", value_name = "DIR", env = "ATTIC_PRUNE_DIR")]
    pub dir: Option<PathBuf>,

    /// Dry-run, just show which files would have been deleted
    #[arg(short = 'n', long = "no-act", visible_alias = "dry-run")]
    pub no_act: bool,

    /// Print detailed information about each file (repeat for debug logs)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output and the closing summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a JSON report instead of human-readable lines
    #[arg(long)]
    pub robot: bool,

    /// Follow symbolic links to directories while scanning
    #[arg(long)]
    pub follow_links: bool,
}

impl Cli {
    /// Build the run configuration, resolving the default root to the
    /// current directory.
    pub fn to_config(&self) -> Result<PruneConfig> {
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(PruneConfig::new(root, self.age)
            .dry_run(self.no_act)
            .verbose(self.verbose > 0)
            .follow_links(self.follow_links))
    }

    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        if self.robot {
            OutputMode::Robot
        } else {
            OutputMode::Human
        }
    }
}
