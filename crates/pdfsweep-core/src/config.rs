// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration and on-disk layout constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::types::BatchOptions;

/// Name of the per-batch working directory created inside the input folder.
pub const TEMP_DIR_NAME: &str = "_temp_unlocked";

/// Prefix of the per-run backup directory (`_backups_<YYYYmmdd_HHMMSS>`).
pub const BACKUP_DIR_PREFIX: &str = "_backups_";

/// Timestamp format of the backup directory suffix (second granularity).
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extension appended to an original path while its replacement is staged.
pub const STAGED_SUFFIX: &str = ".tmp";

/// Default location of the human-readable run log.
pub const DEFAULT_RUN_LOG: &str = "pdf_cleaner.log";

/// Persistent settings, loaded from JSON and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Copy every original into the batch backup directory before touching it.
    pub create_backup: bool,
    /// Program used for restriction removal (looked up on `PATH` if bare).
    pub qpdf_program: String,
    /// Append-only run log. `None` disables it.
    pub run_log: Option<PathBuf>,
    /// Re-hash each backup copy and discard copies that do not match.
    pub verify_backups: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            create_backup: true,
            qpdf_program: "qpdf".into(),
            run_log: Some(PathBuf::from(DEFAULT_RUN_LOG)),
            verify_backups: true,
        }
    }
}

impl SweepConfig {
    /// Read a config file. Fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data)
            .map_err(|e| SweepError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Like [`SweepConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Per-run options derived from this config.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            create_backup: self.create_backup,
            verify_backups: self.verify_backups,
        }
    }
}
