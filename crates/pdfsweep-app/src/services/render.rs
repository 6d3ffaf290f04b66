// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal rendering of progress events, as text or JSON lines.

use std::io::{self, Write};

use pdfsweep_core::types::{FileOutcome, ProgressEvent, RunSummary};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Writes one line per event.
pub struct Renderer<W: Write> {
    format: Format,
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(format: Format, out: W) -> Self {
        Self { format, out }
    }

    pub fn render(&mut self, event: &ProgressEvent) -> io::Result<()> {
        let line = match self.format {
            Format::Json => serde_json::to_string(event).map_err(io::Error::other)?,
            Format::Text => describe(event),
        };
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Human-readable form of an event.
pub fn describe(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::FileStarted {
            index,
            total,
            file_name,
        } => format!("Processing file {index}/{total}: {file_name}"),
        ProgressEvent::FileFinished {
            file_name,
            outcome,
            percent,
            ..
        } => {
            let detail = match outcome {
                FileOutcome::Success { links_removed } => {
                    format!("done, removed {links_removed} links")
                }
                FileOutcome::SkippedLocked => "skipped (password protected)".to_string(),
                FileOutcome::Error { cause } => format!("error: {cause}"),
            };
            format!("[{percent:>3}%] {file_name}: {detail}")
        }
        ProgressEvent::Finished(summary) if summary.total == 0 => {
            "No PDF files found.".to_string()
        }
        ProgressEvent::Finished(summary) => format!("Completed. {}", counts(summary)),
        ProgressEvent::Cancelled(summary) => format!(
            "Cancelled after {} of {} files. {}",
            summary.succeeded + summary.skipped + summary.errored,
            summary.total,
            counts(summary)
        ),
    }
}

fn counts(summary: &RunSummary) -> String {
    let mut text = format!(
        "Success: {}, Skipped: {}, Errors: {}, Total: {}",
        summary.succeeded, summary.skipped, summary.errored, summary.total
    );
    if let Some(dir) = &summary.backup_dir {
        text.push_str(&format!("\nBackups saved in: {}", dir.display()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsweep_core::types::BatchId;
    use std::path::PathBuf;

    fn summary(total: usize, backup_dir: Option<PathBuf>) -> RunSummary {
        RunSummary {
            batch_id: BatchId::new(),
            total,
            succeeded: 2,
            skipped: 1,
            errored: 0,
            backup_dir,
        }
    }

    #[test]
    fn text_lines() {
        let started = ProgressEvent::FileStarted {
            index: 2,
            total: 3,
            file_name: "b.pdf".into(),
        };
        assert_eq!(describe(&started), "Processing file 2/3: b.pdf");

        let finished = ProgressEvent::FileFinished {
            index: 2,
            total: 3,
            file_name: "b.pdf".into(),
            outcome: FileOutcome::Success { links_removed: 2 },
            percent: 66,
        };
        assert_eq!(describe(&finished), "[ 66%] b.pdf: done, removed 2 links");
    }

    #[test]
    fn summary_mentions_retained_backups_only() {
        let with = describe(&ProgressEvent::Finished(summary(
            3,
            Some(PathBuf::from("/in/_backups_20260314_092653")),
        )));
        assert!(with.starts_with("Completed. Success: 2, Skipped: 1, Errors: 0, Total: 3"));
        assert!(with.contains("Backups saved in: /in/_backups_20260314_092653"));

        let without = describe(&ProgressEvent::Cancelled(summary(5, None)));
        assert!(without.starts_with("Cancelled after 3 of 5 files."));
        assert!(!without.contains("Backups"));
    }

    #[test]
    fn json_lines() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(Format::Json, &mut out);
        renderer
            .render(&ProgressEvent::Finished(summary(0, None)))
            .expect("render");

        let line = String::from_utf8(out).expect("utf8");
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).expect("json");
        assert_eq!(value["event"], "finished");
        assert_eq!(value["total"], 0);
    }
}
