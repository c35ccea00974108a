//! Attic pruning: revision name grammar, traversal, and reporting.

pub mod pruner;
pub mod report;
pub mod revision;

pub use pruner::{AtticPruner, PruneObserver};
pub use report::{EntryCollector, PruneAction, PruneEntry, PruneReport, PruneSummary};
pub use revision::{MalformedReason, NameError, RevisionName};
