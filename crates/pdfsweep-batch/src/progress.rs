// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting, the only way the runner talks to its caller.

use std::sync::{Mutex, PoisonError};

use pdfsweep_core::types::ProgressEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Receives events from the runner, in emission order.
///
/// Called synchronously from the batch worker thread; implementations that
/// drive a UI must hand the event over to their own thread.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl ProgressReporter for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        if self.send(event).is_err() {
            trace!("progress receiver dropped; event discarded");
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsweep_core::types::{BatchId, RunSummary};

    fn summary() -> RunSummary {
        RunSummary {
            batch_id: BatchId::new(),
            total: 0,
            succeeded: 0,
            skipped: 0,
            errored: 0,
            backup_dir: None,
        }
    }

    #[test]
    fn channel_reporter_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.report(ProgressEvent::Finished(summary()));
        assert!(matches!(rx.try_recv(), Ok(ProgressEvent::Finished(_))));
    }

    #[test]
    fn channel_reporter_ignores_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.report(ProgressEvent::Cancelled(summary()));
    }

    #[test]
    fn collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(ProgressEvent::FileStarted {
            index: 1,
            total: 1,
            file_name: "a.pdf".into(),
        });
        reporter.report(ProgressEvent::Finished(summary()));

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_terminal());
    }
}
