//! attic-prune - remove expired page revisions from a wiki attic.
//!
//! A wiki stores every saved page revision under `data/attic/` as
//! `<page>.<epoch>.txt.gz`. Nothing ever removes them, so the directory
//! grows by one file per edit. [`AtticPruner`] walks that tree and deletes
//! every revision older than a threshold, optionally as a dry run.

pub mod app;
pub mod attic;
pub mod cli;
pub mod config;
pub mod error;
pub mod test_utils;

pub use attic::{AtticPruner, PruneObserver, PruneReport};
pub use config::PruneConfig;
pub use error::{AtticError, Result};
