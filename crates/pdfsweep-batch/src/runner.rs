// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestrator.
//
// Per candidate, strictly in order:
//   cancel check -> FileStarted -> backup (advisory) -> unrestrict into
//   `_temp_unlocked/<name>` -> strip links into `<original>.tmp` -> rename
//   over the original -> FileFinished
//
// Every per-file failure, panics included, is classified into a
// `FileOutcome` at the file boundary. Temp and backup cleanup happens before
// the terminal event on every exit path.

use std::any::Any;
use std::ffi::OsString;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use pdfsweep_core::config::{STAGED_SUFFIX, SweepConfig, TEMP_DIR_NAME};
use pdfsweep_core::error::{RemoverError, Result, SweepError};
use pdfsweep_core::types::{
    BatchId, BatchOptions, BatchResult, BatchStatus, FileOutcome, ProgressEvent,
    percent_complete,
};
use pdfsweep_document::{LinkStripper, LopdfLinkStripper, QpdfRemover, RestrictionRemover};
use tracing::{debug, info, instrument, warn};

use crate::backup::BackupDir;
use crate::cancel::CancelToken;
use crate::candidates::list_candidates;
use crate::progress::ProgressReporter;
use crate::run_log::RunLog;

/// Drives folders through the pipeline. Reusable: each [`BatchRunner::run`]
/// starts from a fresh result and a cleared cancel token.
pub struct BatchRunner {
    remover: Arc<dyn RestrictionRemover>,
    stripper: Arc<dyn LinkStripper>,
    run_log: Option<PathBuf>,
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("run_log", &self.run_log)
            .finish_non_exhaustive()
    }
}

impl BatchRunner {
    /// Build a runner, probing the restriction remover once.
    ///
    /// Fails with [`SweepError::ToolUnavailable`] if the remover cannot run,
    /// so no batch can start without it.
    pub fn new(
        remover: Arc<dyn RestrictionRemover>,
        stripper: Arc<dyn LinkStripper>,
    ) -> Result<Self> {
        remover
            .check_available()
            .map_err(|err| SweepError::ToolUnavailable(err.to_string()))?;
        Ok(Self {
            remover,
            stripper,
            run_log: None,
        })
    }

    /// Runner backed by `qpdf` and `lopdf`, as configured.
    pub fn from_config(config: &SweepConfig) -> Result<Self> {
        let remover = Arc::new(QpdfRemover::new(&config.qpdf_program));
        let stripper = Arc::new(LopdfLinkStripper::new());
        Ok(Self::new(remover, stripper)?.with_run_log(config.run_log.clone()))
    }

    /// Append a human-readable record of each run to `path`.
    pub fn with_run_log(mut self, path: Option<PathBuf>) -> Self {
        self.run_log = path;
        self
    }

    /// Process every candidate PDF in `folder`.
    ///
    /// Clears `cancel` first. Returns `Err` only for folder-level
    /// preconditions. An empty folder is a normal result with
    /// [`BatchStatus::NoCandidates`].
    pub fn run(
        &self,
        folder: &Path,
        options: BatchOptions,
        cancel: &CancelToken,
        reporter: &dyn ProgressReporter,
    ) -> Result<BatchResult> {
        cancel.reset();
        self.run_with_token(folder, options, cancel, reporter)
    }

    /// Like [`BatchRunner::run`], but honours a cancel requested before the
    /// call. The caller owns clearing the token.
    #[instrument(skip_all, fields(folder = %folder.display(), batch_id = tracing::field::Empty))]
    pub(crate) fn run_with_token(
        &self,
        folder: &Path,
        options: BatchOptions,
        cancel: &CancelToken,
        reporter: &dyn ProgressReporter,
    ) -> Result<BatchResult> {
        let candidates = list_candidates(folder)?;
        let mut log = RunLog::open_or_disabled(self.run_log.as_deref());
        let mut result = BatchResult::new(BatchId::new(), folder.to_path_buf(), candidates.len());
        tracing::Span::current().record("batch_id", tracing::field::display(result.batch_id));
        info!(total = result.total, "batch started");
        log.info(&format!(
            "Starting batch {} in {} ({} files)",
            result.batch_id,
            folder.display(),
            result.total
        ));

        if candidates.is_empty() {
            log.warning(&format!("No PDF files found in {}", folder.display()));
            reporter.report(ProgressEvent::Finished(result.summary()));
            return Ok(result);
        }

        let mut job = BatchJob {
            candidates,
            options,
            scratch: Scratch::create(folder)?,
            backups: options
                .create_backup
                .then(|| BackupDir::for_run(folder, Local::now())),
        };

        let cancelled = self.drive(&job, cancel, reporter, &mut log, &mut result);

        match job.scratch.finish() {
            Ok(()) => log.info("Temp folder cleaned up"),
            Err(err) => warn!(error = %err, "could not remove temp folder"),
        }
        result.backup_dir = job.backups.and_then(BackupDir::finish);

        let summary = result.summary();
        if cancelled {
            result.status = BatchStatus::Cancelled;
            log.warning("Processing cancelled by user");
        }
        log.info(&format!(
            "Summary - Success: {}, Skipped: {}, Errors: {}",
            result.succeeded, result.skipped, result.errored
        ));
        info!(
            succeeded = result.succeeded,
            skipped = result.skipped,
            errored = result.errored,
            cancelled,
            "batch finished"
        );

        reporter.report(if cancelled {
            ProgressEvent::Cancelled(summary)
        } else {
            ProgressEvent::Finished(summary)
        });
        Ok(result)
    }

    /// The file loop. Returns `true` if cancellation stopped it early.
    fn drive(
        &self,
        job: &BatchJob,
        cancel: &CancelToken,
        reporter: &dyn ProgressReporter,
        log: &mut RunLog,
        result: &mut BatchResult,
    ) -> bool {
        let total = job.candidates.len();
        for (offset, original) in job.candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(processed = offset, total, "cancellation observed");
                return true;
            }

            let index = offset + 1;
            let file_name = display_name(original);
            reporter.report(ProgressEvent::FileStarted {
                index,
                total,
                file_name: file_name.clone(),
            });
            log.info(&format!("Processing: {file_name}"));

            if let Some(backups) = &job.backups {
                if backups.back_up(original, job.options.verify_backups) {
                    log.info(&format!(
                        "Backup created: {}",
                        backups.path().join(&file_name).display()
                    ));
                } else {
                    log.warning(&format!("Backup failed for {file_name}"));
                    log.warning(&format!("Continuing without backup for: {file_name}"));
                }
            }

            let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
                self.process_file(original, job.scratch.path())
            }));
            let outcome = classify(attempt);
            match &outcome {
                FileOutcome::Success { links_removed } => {
                    log.info(&format!("Success: {file_name} (removed {links_removed} links)"))
                }
                FileOutcome::SkippedLocked => {
                    log.warning(&format!("Skipped (locked): {file_name}"))
                }
                FileOutcome::Error { cause } => {
                    log.error(&format!("Error processing {file_name}: {cause}"))
                }
            }
            debug!(file = %file_name, outcome = outcome.label(), "file classified");

            result.record(file_name.clone(), outcome.clone());
            reporter.report(ProgressEvent::FileFinished {
                index,
                total,
                file_name,
                outcome,
                percent: percent_complete(index, total),
            });
        }
        false
    }

    /// Unrestrict, strip and replace one file. Intermediate files are removed
    /// before this returns, whatever the outcome.
    #[instrument(skip_all, fields(path = %original.display()))]
    fn process_file(&self, original: &Path, scratch: &Path) -> Result<usize> {
        let file_name = original.file_name().ok_or_else(|| {
            SweepError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "candidate has no file name",
            ))
        })?;
        let unlocked = scratch.join(file_name);
        let staged = staged_path(original);
        if staged.exists() {
            warn!(staged = %staged.display(), "overwriting leftover staged file");
        }

        let outcome = (|| -> Result<usize> {
            self.remover.unrestrict(original, &unlocked)?;
            let removed = self.stripper.strip_links(&unlocked, &staged)?;
            replace_atomically(&staged, original)?;
            Ok(removed)
        })();

        discard(&unlocked);
        discard(&staged);
        outcome
    }
}

/// State owned by one [`BatchRunner::run`] invocation.
struct BatchJob {
    /// Snapshot taken at start; never refreshed.
    candidates: Vec<PathBuf>,
    options: BatchOptions,
    scratch: Scratch,
    backups: Option<BackupDir>,
}

/// The per-run `_temp_unlocked` directory. Removed by [`Scratch::finish`],
/// or on drop if the run unwinds.
struct Scratch {
    path: PathBuf,
    removed: bool,
}

impl Scratch {
    /// Create the directory, clearing anything a crashed run left behind.
    fn create(folder: &Path) -> io::Result<Self> {
        let path = folder.join(TEMP_DIR_NAME);
        if path.is_dir() {
            debug!(path = %path.display(), "clearing stale temp folder");
            std::fs::remove_dir_all(&path)?;
        } else if path.exists() {
            std::fs::remove_file(&path)?;
        }
        std::fs::create_dir(&path)?;
        Ok(Self {
            path,
            removed: false,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn finish(&mut self) -> io::Result<()> {
        self.removed = true;
        match std::fs::remove_dir_all(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

fn classify(attempt: std::thread::Result<Result<usize>>) -> FileOutcome {
    match attempt {
        Ok(Ok(links_removed)) => FileOutcome::Success { links_removed },
        Ok(Err(SweepError::Unrestrict(RemoverError::PasswordRequired(_)))) => {
            FileOutcome::SkippedLocked
        }
        Ok(Err(err)) => FileOutcome::Error {
            cause: err.to_string(),
        },
        Err(payload) => FileOutcome::Error {
            cause: format!("internal failure: {}", panic_message(&*payload)),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "panic"
    }
}

/// `<original>.tmp`, next to the original so the final rename never crosses
/// a filesystem.
fn staged_path(original: &Path) -> PathBuf {
    let mut staged = OsString::from(original.as_os_str());
    staged.push(STAGED_SUFFIX);
    PathBuf::from(staged)
}

/// Move `staged` over `original` in one rename.
fn replace_atomically(staged: &Path, original: &Path) -> Result<()> {
    std::fs::rename(staged, original).map_err(|source| SweepError::Replace {
        path: original.to_path_buf(),
        source,
    })
}

fn discard(path: &Path) {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            warn!(path = %path.display(), error = %err, "could not remove intermediate file");
        }
        _ => {}
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
