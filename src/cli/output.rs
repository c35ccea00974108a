use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::attic::{
    MalformedReason, PruneAction, PruneEntry, PruneObserver, PruneReport, PruneSummary,
};
use crate::error::{AtticError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Robot,
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
    Partial { completed: usize, failed: usize },
}

fn robot_response<T: Serialize>(status: RobotStatus, data: T) -> RobotResponse<T> {
    RobotResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

/// Robot payload: the run totals plus the per-file entries the caller chose
/// to collect.
#[derive(Serialize)]
pub struct RobotReport<'a> {
    #[serde(flatten)]
    pub report: &'a PruneReport,
    pub entries: &'a [PruneEntry],
}

/// Wrap a finished report; any failed deletion or unreadable directory
/// makes the status `partial`.
#[must_use]
pub fn robot_report<'a>(
    report: &'a PruneReport,
    entries: &'a [PruneEntry],
) -> RobotResponse<RobotReport<'a>> {
    let summary = report.summary;
    let status = if summary.has_failures() {
        RobotStatus::Partial {
            completed: summary.deleted,
            failed: summary.failed + summary.walk_errors,
        }
    } else {
        RobotStatus::Ok
    };
    robot_response(status, RobotReport { report, entries })
}

pub fn robot_error(err: &AtticError) -> RobotResponse<serde_json::Value> {
    robot_response(
        RobotStatus::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        },
        serde_json::Value::Null,
    )
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| AtticError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Streams line-oriented diagnostics while a prune runs.
///
/// Directory and keep lines appear only when verbose. Delete lines appear
/// when verbose or on a dry run. Problems are always printed.
pub struct HumanReporter<W: Write> {
    out: W,
    verbose: bool,
    dry_run: bool,
    error: Option<io::Error>,
}

impl HumanReporter<io::Stdout> {
    #[must_use]
    pub fn stdout(verbose: bool, dry_run: bool) -> Self {
        Self::new(io::stdout(), verbose, dry_run)
    }
}

impl<W: Write> HumanReporter<W> {
    pub fn new(out: W, verbose: bool, dry_run: bool) -> Self {
        Self {
            out,
            verbose,
            dry_run,
            error: None,
        }
    }

    fn line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            self.error = Some(err);
        }
    }

    fn deleting_line(&mut self, path: &Path, age_days: Option<i64>) {
        let age = age_days.unwrap_or_default();
        self.line(&format!(
            "deleting file {} with an age of {age} days",
            path.display()
        ));
    }

    /// Print the closing summary if asked and surface any write error.
    pub fn finish(mut self, report: &PruneReport, show_summary: bool) -> Result<W> {
        if show_summary {
            let line = summary_line(&report.summary, report.dry_run);
            self.line(&line);
        }
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> PruneObserver for HumanReporter<W> {
    fn on_directory(&mut self, dir: &Path) {
        if self.verbose {
            self.line(&format!("processing directory {}", dir.display()));
        }
    }

    fn on_entry(&mut self, entry: &PruneEntry) {
        let path = entry.path.as_path();
        match &entry.action {
            PruneAction::Kept => {
                if self.verbose {
                    let age = entry.age_days.unwrap_or_default();
                    self.line(&format!(
                        "skipping file {} with an age of {age} days",
                        path.display()
                    ));
                }
            }
            PruneAction::Deleted | PruneAction::WouldDelete => {
                if self.verbose || self.dry_run {
                    self.deleting_line(path, entry.age_days);
                }
            }
            PruneAction::Failed { error } => {
                if self.verbose {
                    self.deleting_line(path, entry.age_days);
                }
                self.line(&format!(
                    "{} failed to delete '{}': {error}",
                    "error:".red().bold(),
                    path.display()
                ));
            }
            PruneAction::Malformed { reason, .. } => {
                let what = match reason {
                    MalformedReason::InvalidTimestamp => "invalid timestamp in file name",
                    MalformedReason::TooFewSegments => "file with unexpected name",
                };
                self.line(&format!(
                    "{} {what}: '{}'",
                    "error:".red().bold(),
                    path.display()
                ));
            }
            PruneAction::WalkFailed { error } => {
                self.line(&format!(
                    "{} cannot read '{}': {error}",
                    "error:".red().bold(),
                    path.display()
                ));
            }
        }
    }
}

#[must_use]
pub fn summary_line(summary: &PruneSummary, dry_run: bool) -> String {
    if dry_run {
        format!(
            "would prune {} of {} revisions ({} kept, {} malformed)",
            summary.expired,
            summary.expired + summary.kept,
            summary.kept,
            summary.malformed
        )
    } else {
        format!(
            "pruned {} of {} expired revisions ({} kept, {} failed, {} malformed)",
            summary.deleted, summary.expired, summary.kept, summary.failed, summary.malformed
        )
    }
}
