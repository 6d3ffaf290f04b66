// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfsweep Batch. Drives every PDF in a folder through restriction removal,
// link stripping and atomic replacement, one file at a time, with backups,
// cooperative cancellation and an ordered stream of progress events.

pub mod backup;
pub mod cancel;
pub mod candidates;
pub mod integrity;
pub mod progress;
pub mod run_log;
pub mod runner;
pub mod worker;

pub use backup::{BackupDir, ensure_backup};
pub use cancel::CancelToken;
pub use candidates::list_candidates;
pub use progress::{CollectingReporter, NullReporter, ProgressReporter};
pub use run_log::RunLog;
pub use runner::BatchRunner;
pub use worker::{BatchHandle, spawn_batch};
