//! Revision filename grammar.
//!
//! Every stored page revision is named `<page>.<epoch>.txt.gz`, where
//! `<page>` may itself contain dots and `<epoch>` is the Unix time in seconds
//! at which the revision was saved. The epoch is always the third segment
//! from the end once the name is split on `.`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Suffix shared by all revision files.
pub const REVISION_SUFFIX: &str = ".txt.gz";

/// Fewest `.`-separated segments a revision name can have.
pub const MIN_SEGMENTS: usize = 4;

/// Why a file name could not be read as a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name does not end in [`REVISION_SUFFIX`]; not a revision at all.
    NotRevision,
    /// Suffix matched but there is no room for a timestamp segment.
    TooFewSegments { found: usize },
    /// The timestamp segment is not a representable epoch second count.
    InvalidTimestamp { segment: String },
}

/// Why a name that carries the revision suffix was still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    TooFewSegments,
    InvalidTimestamp,
}

impl NameError {
    /// `None` for names that are simply not revisions.
    #[must_use]
    pub const fn malformed_reason(&self) -> Option<MalformedReason> {
        match self {
            Self::NotRevision => None,
            Self::TooFewSegments { .. } => Some(MalformedReason::TooFewSegments),
            Self::InvalidTimestamp { .. } => Some(MalformedReason::InvalidTimestamp),
        }
    }

    /// Short machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotRevision => "not_revision",
            Self::TooFewSegments { .. } => "too_few_segments",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
        }
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRevision => write!(f, "name does not end in {REVISION_SUFFIX}"),
            Self::TooFewSegments { found } => write!(
                f,
                "expected at least {MIN_SEGMENTS} '.'-separated segments, found {found}"
            ),
            Self::InvalidTimestamp { segment } => {
                write!(f, "'{segment}' is not a valid epoch timestamp")
            }
        }
    }
}

impl std::error::Error for NameError {}

/// A parsed revision file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionName {
    /// Encoded page id, everything before the timestamp segment.
    pub page: String,
    /// Raw epoch seconds as written in the name.
    pub epoch: i64,
    /// The epoch interpreted as a UTC instant.
    pub timestamp: DateTime<Utc>,
}

impl RevisionName {
    /// Parse a bare file name (no directory component).
    pub fn parse(name: &str) -> Result<Self, NameError> {
        if !is_revision_file(name) {
            return Err(NameError::NotRevision);
        }

        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(NameError::TooFewSegments {
                found: segments.len(),
            });
        }

        let stamp_idx = segments.len() - 3;
        let raw = segments[stamp_idx];
        let invalid = || NameError::InvalidTimestamp {
            segment: raw.to_string(),
        };
        let epoch = raw.parse::<i64>().map_err(|_| invalid())?;
        let timestamp = DateTime::<Utc>::from_timestamp(epoch, 0).ok_or_else(invalid)?;

        Ok(Self {
            page: segments[..stamp_idx].join("."),
            epoch,
            timestamp,
        })
    }

    /// Whole days elapsed between this revision and `now`.
    ///
    /// Truncates toward zero. Revisions dated after `now` get a negative age.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.timestamp).num_days()
    }
}

/// Cheap suffix test applied before any parsing.
#[must_use]
pub fn is_revision_file(name: &str) -> bool {
    name.ends_with(REVISION_SUFFIX)
}

/// Retention rule: a revision is expired only when strictly older than
/// `max_age_days`.
#[must_use]
pub fn is_expired(age_days: i64, max_age_days: u32) -> bool {
    age_days > i64::from(max_age_days)
}
