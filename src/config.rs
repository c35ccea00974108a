use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AtticError, Result};

/// Attic location relative to the wiki root.
pub const ATTIC_SUBDIR: &str = "data/attic";

/// Forces simulate-only mode when truthy.
pub const ENV_DRY_RUN: &str = "ATTIC_PRUNE_DRY_RUN";
/// Switches output to a JSON report when truthy.
pub const ENV_ROBOT: &str = "ATTIC_PRUNE_ROBOT";

/// Settings for a single prune run. Built once, never mutated while the
/// run is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneConfig {
    /// Wiki root; must contain `data/attic`.
    pub root: PathBuf,
    /// Revisions this many days old or younger are kept.
    pub max_age_days: u32,
    /// Report what would be removed without touching the filesystem.
    pub dry_run: bool,
    /// Announce every directory and every revision decision.
    pub verbose: bool,
    /// Descend into symlinked directories.
    pub follow_links: bool,
}

impl PruneConfig {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_age_days: u32) -> Self {
        Self {
            root: root.into(),
            max_age_days,
            dry_run: false,
            verbose: false,
            follow_links: false,
        }
    }

    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub const fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    #[must_use]
    pub fn attic_dir(&self) -> PathBuf {
        attic_dir(&self.root)
    }

    /// Resolve the attic and make sure it is a directory.
    pub fn validate(&self) -> Result<PathBuf> {
        let attic = self.attic_dir();
        if attic.is_dir() {
            Ok(attic)
        } else {
            Err(AtticError::AtticNotFound {
                root: self.root.clone(),
                attic,
            })
        }
    }

    /// Apply overrides using an arbitrary variable lookup.
    ///
    /// An override can only turn dry-run on; it never cancels a dry run the
    /// caller asked for.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if env_bool(&lookup, ENV_DRY_RUN)?.unwrap_or(false) {
            self.dry_run = true;
        }
        Ok(())
    }
}

#[must_use]
pub fn attic_dir(root: &Path) -> PathBuf {
    root.join(ATTIC_SUBDIR)
}

/// Parse a boolean variable strictly; unset is `None`, anything outside the
/// accepted spellings is a configuration error.
pub fn env_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<bool>> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "" | "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(AtticError::Config(format!(
            "invalid {key} value {other} (expected 1|0|true|false|yes|no|on|off)"
        ))),
    }
}
