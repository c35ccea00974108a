//! Per-entry outcomes and run totals.
//!
//! The pruner keeps only counters. Each [`PruneEntry`] is handed to the
//! observer and dropped; callers that want the full list opt in with an
//! [`EntryCollector`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::attic::pruner::PruneObserver;
use crate::attic::revision::MalformedReason;

/// What happened to one revision file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum PruneAction {
    /// Young enough to keep.
    Kept,
    /// Expired and removed.
    Deleted,
    /// Expired, but the run was a dry run.
    WouldDelete,
    /// Expired, removal was refused by the filesystem.
    Failed { error: String },
    /// Suffix matched but the name could not be parsed.
    Malformed {
        reason: MalformedReason,
        detail: String,
    },
    /// A directory under the attic could not be read.
    WalkFailed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneEntry {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_days: Option<i64>,
    #[serde(flatten)]
    pub action: PruneAction,
}

impl PruneEntry {
    #[must_use]
    pub fn new(path: &Path, age_days: Option<i64>, action: PruneAction) -> Self {
        Self {
            path: path.to_path_buf(),
            age_days,
            action,
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    /// Directories visited, the attic root included.
    pub directories: usize,
    /// Non-directory entries seen.
    pub scanned: usize,
    /// Entries without the revision suffix.
    pub ignored: usize,
    pub kept: usize,
    /// Revisions older than the threshold, deleted or not.
    pub expired: usize,
    pub deleted: usize,
    pub failed: usize,
    pub malformed: usize,
    pub walk_errors: usize,
}

impl PruneSummary {
    /// Whether any per-file operation went wrong.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0 || self.walk_errors > 0
    }

    pub(crate) const fn count(&mut self, action: &PruneAction) {
        match action {
            PruneAction::Kept => self.kept += 1,
            PruneAction::Deleted => {
                self.expired += 1;
                self.deleted += 1;
            }
            PruneAction::WouldDelete => self.expired += 1,
            PruneAction::Failed { .. } => {
                self.expired += 1;
                self.failed += 1;
            }
            PruneAction::Malformed { .. } => self.malformed += 1,
            PruneAction::WalkFailed { .. } => self.walk_errors += 1,
        }
    }
}

/// Totals for a prune run. Holds no per-file state.
#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    pub attic: PathBuf,
    pub now: DateTime<Utc>,
    pub max_age_days: u32,
    pub dry_run: bool,
    pub summary: PruneSummary,
}

impl PruneReport {
    pub(crate) fn new(attic: PathBuf, now: DateTime<Utc>, max_age_days: u32, dry_run: bool) -> Self {
        Self {
            attic,
            now,
            max_age_days,
            dry_run,
            summary: PruneSummary::default(),
        }
    }
}

/// Observer that keeps every entry, in traversal order.
#[derive(Debug, Default)]
pub struct EntryCollector {
    pub entries: Vec<PruneEntry>,
}

impl EntryCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries whose action matches `pred`.
    pub fn entries_where<'a>(
        &'a self,
        pred: impl Fn(&PruneAction) -> bool + 'a,
    ) -> impl Iterator<Item = &'a PruneEntry> + 'a {
        self.entries.iter().filter(move |entry| pred(&entry.action))
    }
}

impl PruneObserver for EntryCollector {
    fn on_entry(&mut self, entry: &PruneEntry) {
        self.entries.push(entry.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_updates_counters() {
        let mut s = PruneSummary::default();
        s.count(&PruneAction::Kept);
        s.count(&PruneAction::Deleted);
        s.count(&PruneAction::Failed {
            error: "permission denied".to_string(),
        });
        s.count(&PruneAction::Malformed {
            reason: MalformedReason::TooFewSegments,
            detail: "found 3".to_string(),
        });

        assert_eq!(s.kept, 1);
        assert_eq!(s.expired, 2);
        assert_eq!(s.deleted, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.malformed, 1);
        assert!(s.has_failures());
    }

    #[test]
    fn dry_run_counts_expired_without_deleting() {
        let mut s = PruneSummary::default();
        s.count(&PruneAction::WouldDelete);
        assert_eq!(s.expired, 1);
        assert_eq!(s.deleted, 0);
        assert!(!s.has_failures());
    }

    #[test]
    fn walk_errors_count_as_failures() {
        let mut s = PruneSummary::default();
        s.count(&PruneAction::WalkFailed {
            error: "loop".to_string(),
        });
        assert_eq!(s.walk_errors, 1);
        assert!(s.has_failures());
    }

    #[test]
    fn entries_serialize_with_flat_action_tag() {
        let entry = PruneEntry::new(Path::new("a.1.txt.gz"), Some(45), PruneAction::WouldDelete);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "would_delete");
        assert_eq!(json["age_days"], 45);
        assert_eq!(json["path"], "a.1.txt.gz");

        let malformed = PruneEntry::new(
            Path::new("x.txt.gz"),
            None,
            PruneAction::Malformed {
                reason: MalformedReason::InvalidTimestamp,
                detail: String::new(),
            },
        );
        let json = serde_json::to_value(&malformed).unwrap();
        assert_eq!(json["action"], "malformed");
        assert_eq!(json["reason"], "invalid_timestamp");
        assert!(json.get("age_days").is_none());
    }

    #[test]
    fn collector_filters_by_action() {
        let mut collector = EntryCollector::new();
        collector.on_entry(&PruneEntry::new(Path::new("a"), Some(1), PruneAction::Kept));
        collector.on_entry(&PruneEntry::new(Path::new("b"), Some(99), PruneAction::Deleted));
        let deleted: Vec<_> = collector
            .entries_where(|a| matches!(a, PruneAction::Deleted))
            .map(|e| e.path.clone())
            .collect();
        assert_eq!(deleted, vec![PathBuf::from("b")]);
    }
}
