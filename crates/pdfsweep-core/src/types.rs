// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the batch pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Copy each original into the backup directory before processing it.
    pub create_backup: bool,
    /// Verify each backup copy by SHA-256.
    pub verify_backups: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            create_backup: true,
            verify_backups: true,
        }
    }
}

/// Classified result of processing one candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Restrictions and links removed, original replaced.
    Success { links_removed: usize },
    /// Restriction removal needs a user password; the file was left untouched.
    SkippedLocked,
    /// Any other failure; the file was left untouched.
    Error { cause: String },
}

impl FileOutcome {
    /// Short label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::SkippedLocked => "skipped (locked)",
            Self::Error { .. } => "error",
        }
    }
}

/// Outcome of one file, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_name: String,
    pub outcome: FileOutcome,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every candidate received an outcome.
    Completed,
    /// Cancellation stopped the loop before the last candidate.
    Cancelled,
    /// The folder held no matching files; nothing was touched.
    NoCandidates,
}

/// Aggregated result of a run.
///
/// Only the orchestrator mutates this, one file at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: BatchId,
    pub folder: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Set only when backups were enabled and the directory was retained.
    pub backup_dir: Option<PathBuf>,
    pub status: BatchStatus,
    pub files: Vec<FileRecord>,
}

impl BatchResult {
    pub fn new(batch_id: BatchId, folder: PathBuf, total: usize) -> Self {
        Self {
            batch_id,
            folder,
            total,
            succeeded: 0,
            skipped: 0,
            errored: 0,
            backup_dir: None,
            status: if total == 0 {
                BatchStatus::NoCandidates
            } else {
                BatchStatus::Completed
            },
            files: Vec::with_capacity(total),
        }
    }

    /// Count an outcome and append it to the per-file list.
    pub fn record(&mut self, file_name: impl Into<String>, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Success { .. } => self.succeeded += 1,
            FileOutcome::SkippedLocked => self.skipped += 1,
            FileOutcome::Error { .. } => self.errored += 1,
        }
        self.files.push(FileRecord {
            file_name: file_name.into(),
            outcome,
        });
    }

    /// Number of candidates that received an outcome.
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.errored
    }

    /// Total link annotations removed across all successful files.
    pub fn links_removed(&self) -> usize {
        self.files
            .iter()
            .map(|record| match record.outcome {
                FileOutcome::Success { links_removed } => links_removed,
                _ => 0,
            })
            .sum()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BatchStatus::Cancelled
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            batch_id: self.batch_id,
            total: self.total,
            succeeded: self.succeeded,
            skipped: self.skipped,
            errored: self.errored,
            backup_dir: self.backup_dir.clone(),
        }
    }
}

/// Counts carried by the terminal progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub batch_id: BatchId,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub errored: usize,
    pub backup_dir: Option<PathBuf>,
}

/// Events emitted by the orchestrator, in order.
///
/// Per-file events carry 1-based indices that strictly increase. Exactly one
/// of `Finished` or `Cancelled` ends every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    FileStarted {
        index: usize,
        total: usize,
        file_name: String,
    },
    FileFinished {
        index: usize,
        total: usize,
        file_name: String,
        outcome: FileOutcome,
        percent: u8,
    },
    Finished(RunSummary),
    Cancelled(RunSummary),
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Cancelled(_))
    }
}

/// `floor(index / total * 100)`, clamped to 100. Zero when `total` is zero.
pub fn percent_complete(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (index.min(total) * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_floors() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 66);
        assert_eq!(percent_complete(3, 3), 100);
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(7, 5), 100);
    }

    #[test]
    fn record_counts_each_category_once() {
        let mut result = BatchResult::new(BatchId::new(), PathBuf::from("/in"), 3);
        result.record("a.pdf", FileOutcome::Success { links_removed: 0 });
        result.record("b.pdf", FileOutcome::Success { links_removed: 2 });
        result.record("c.pdf", FileOutcome::SkippedLocked);

        assert_eq!(result.succeeded, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errored, 0);
        assert_eq!(result.processed(), result.total);
        assert_eq!(result.links_removed(), 2);
        assert_eq!(result.files[2].file_name, "c.pdf");
    }

    #[test]
    fn empty_batch_starts_as_no_candidates() {
        let result = BatchResult::new(BatchId::new(), PathBuf::from("/in"), 0);
        assert_eq!(result.status, BatchStatus::NoCandidates);
    }

    #[test]
    fn events_serialize_with_a_tag() {
        let event = ProgressEvent::FileFinished {
            index: 1,
            total: 2,
            file_name: "a.pdf".into(),
            outcome: FileOutcome::Success { links_removed: 4 },
            percent: 50,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "file_finished");
        assert_eq!(json["outcome"]["kind"], "success");
        assert_eq!(json["outcome"]["links_removed"], 4);
        assert!(!event.is_terminal());
    }
}
