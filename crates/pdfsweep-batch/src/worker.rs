// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background execution: the batch runs on a blocking worker thread while the
// caller keeps receiving progress events and may request cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use pdfsweep_core::error::{Result, SweepError};
use pdfsweep_core::types::{BatchOptions, BatchResult, ProgressEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::runner::BatchRunner;

/// Caller's side of a running batch.
#[derive(Debug)]
pub struct BatchHandle {
    events: UnboundedReceiver<ProgressEvent>,
    cancel: CancelToken,
    task: JoinHandle<Result<BatchResult>>,
}

/// Start `runner` on `folder` in the blocking pool of the current Tokio
/// runtime and return immediately.
pub fn spawn_batch(
    runner: Arc<BatchRunner>,
    folder: PathBuf,
    options: BatchOptions,
) -> BatchHandle {
    let (tx, events) = mpsc::unbounded_channel();
    let cancel = CancelToken::new();
    cancel.reset();
    let worker_cancel = cancel.clone();

    let task = tokio::task::spawn_blocking(move || {
        debug!(folder = %folder.display(), "batch worker started");
        runner.run_with_token(&folder, options, &worker_cancel, &tx)
    });

    BatchHandle {
        events,
        cancel,
        task,
    }
}

impl BatchHandle {
    /// A token that cancels this batch. Clone it into signal handlers.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask the batch to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next event, or `None` once the worker has finished and every event
    /// has been drained.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Wait for the worker and return its result. Events not yet received
    /// are dropped.
    pub async fn join(self) -> Result<BatchResult> {
        self.task
            .await
            .map_err(|err| SweepError::Worker(err.to_string()))?
    }
}
