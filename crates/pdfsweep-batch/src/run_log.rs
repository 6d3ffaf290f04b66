// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run log: append-only, human-readable record of each classified outcome
// and the run summary.
//
// Line format:
//   2026-03-14 09:26:53,589 - INFO - Success: a.pdf (removed 2 links)

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use tracing::{debug, instrument, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Severity tag written into each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Append-only text log. A disabled log swallows every line.
///
/// Write failures never affect the run; they are reported through `tracing`
/// and otherwise ignored.
#[derive(Debug, Default)]
pub struct RunLog {
    file: Option<File>,
}

impl RunLog {
    /// Open (or create) the log at `path` for appending.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("run log opened");
        Ok(Self { file: Some(file) })
    }

    /// A log that writes nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open `path` if given, falling back to a disabled log when it cannot
    /// be opened.
    pub fn open_or_disabled(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::disabled();
        };
        Self::open(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "run log unavailable; continuing without it");
            Self::disabled()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn info(&mut self, message: &str) {
        self.write(Level::Info, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.write(Level::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.write(Level::Error, message);
    }

    fn write(&mut self, level: Level, message: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let line = format!(
            "{} - {} - {message}\n",
            Local::now().format(TIMESTAMP_FORMAT),
            level.as_str()
        );
        if let Err(err) = file.write_all(line.as_bytes()) {
            warn!(error = %err, "run log write failed");
        }
    }
}
