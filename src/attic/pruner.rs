//! Attic traversal and retention.
//!
//! A run is a single sequential pass: validate the attic, walk it, and for
//! every revision file decide between keeping and deleting. Problems with
//! one file are counted and the walk moves on; only a missing attic stops
//! the run before anything is touched. Per-file entries go to the observer
//! and are not retained.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use walkdir::{DirEntry, WalkDir};

use crate::attic::report::{PruneAction, PruneEntry, PruneReport};
use crate::attic::revision::{self, NameError, RevisionName};
use crate::config::PruneConfig;
use crate::error::Result;

/// Receives progress while a run is in flight.
///
/// Both hooks default to no-ops, so `()` works as a silent observer.
pub trait PruneObserver {
    fn on_directory(&mut self, _dir: &Path) {}
    fn on_entry(&mut self, _entry: &PruneEntry) {}
}

impl PruneObserver for () {}

pub struct AtticPruner<'a> {
    config: &'a PruneConfig,
}

impl<'a> AtticPruner<'a> {
    #[must_use]
    pub const fn new(config: &'a PruneConfig) -> Self {
        Self { config }
    }

    /// Prune relative to the current time.
    pub fn prune(&self, observer: &mut dyn PruneObserver) -> Result<PruneReport> {
        self.prune_at(Utc::now(), observer)
    }

    /// Prune relative to a fixed `now`, sampled once for the whole run.
    pub fn prune_at(
        &self,
        now: DateTime<Utc>,
        observer: &mut dyn PruneObserver,
    ) -> Result<PruneReport> {
        let attic = self.config.validate()?;
        tracing::info!(
            attic = %attic.display(),
            max_age_days = self.config.max_age_days,
            dry_run = self.config.dry_run,
            "Pruning attic"
        );

        let mut report = PruneReport::new(
            attic.clone(),
            now,
            self.config.max_age_days,
            self.config.dry_run,
        );

        for entry in WalkDir::new(&attic).follow_links(self.config.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(attic.as_path()).to_path_buf();
                    tracing::warn!(path = %path.display(), error = %err, "Failed to read attic entry");
                    let action = PruneAction::WalkFailed {
                        error: err.to_string(),
                    };
                    emit(&mut report, observer, &path, None, action);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                report.summary.directories += 1;
                tracing::debug!(path = %entry.path().display(), "Processing directory");
                observer.on_directory(entry.path());
                continue;
            }

            report.summary.scanned += 1;
            self.visit_file(&entry, now, &mut report, observer);
        }

        let summary = &report.summary;
        tracing::info!(
            directories = summary.directories,
            kept = summary.kept,
            expired = summary.expired,
            deleted = summary.deleted,
            failed = summary.failed,
            malformed = summary.malformed,
            walk_errors = summary.walk_errors,
            "Attic prune completed"
        );

        Ok(report)
    }

    fn visit_file(
        &self,
        entry: &DirEntry,
        now: DateTime<Utc>,
        report: &mut PruneReport,
        observer: &mut dyn PruneObserver,
    ) {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str() else {
            tracing::trace!(path = %path.display(), "Skipping non-UTF8 file name");
            report.summary.ignored += 1;
            return;
        };

        if !revision::is_revision_file(name) {
            tracing::trace!(path = %path.display(), "Not a revision file");
            report.summary.ignored += 1;
            return;
        }

        let (age_days, action) = match RevisionName::parse(name) {
            Ok(rev) => {
                let age_days = rev.age_days(now);
                (Some(age_days), self.decide(path, age_days))
            }
            Err(NameError::NotRevision) => {
                report.summary.ignored += 1;
                return;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), reason = err.reason(), "Unexpected revision file name");
                let Some(reason) = err.malformed_reason() else {
                    report.summary.ignored += 1;
                    return;
                };
                (
                    None,
                    PruneAction::Malformed {
                        reason,
                        detail: err.to_string(),
                    },
                )
            }
        };

        emit(report, observer, path, age_days, action);
    }

    fn decide(&self, path: &Path, age_days: i64) -> PruneAction {
        if !revision::is_expired(age_days, self.config.max_age_days) {
            tracing::debug!(path = %path.display(), age_days, "Keeping revision");
            return PruneAction::Kept;
        }

        if self.config.dry_run {
            tracing::debug!(path = %path.display(), age_days, "Would delete revision");
            return PruneAction::WouldDelete;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), age_days, "Deleted revision");
                PruneAction::Deleted
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "Failed to delete revision");
                PruneAction::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}

fn emit(
    report: &mut PruneReport,
    observer: &mut dyn PruneObserver,
    path: &Path,
    age_days: Option<i64>,
    action: PruneAction,
) {
    report.summary.count(&action);
    observer.on_entry(&PruneEntry::new(path, age_days, action));
}
