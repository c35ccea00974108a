//! Error types for attic-prune.
//!
//! Only run-level failures live here. Problems with a single revision file
//! are recorded in the [`PruneReport`](crate::attic::PruneReport) and never
//! abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtticError {
    #[error(
        "'{}' does not look like a wiki root directory, cannot find directory '{}'",
        .root.display(),
        .attic.display()
    )]
    AtticNotFound { root: PathBuf, attic: PathBuf },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AtticError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AtticNotFound { .. } => "attic_not_found",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, AtticError>;
