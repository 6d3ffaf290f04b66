// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backup manager. Copies originals into `_backups_<timestamp>/` before they
// are touched, and removes the directory again if nothing landed in it.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use filetime::FileTime;
use pdfsweep_core::config::{BACKUP_DIR_PREFIX, BACKUP_TIMESTAMP_FORMAT};
use tracing::{debug, instrument, warn};

use crate::integrity;

/// Copy `original` into `backup_dir`, creating the directory if needed.
///
/// Returns `false` on any I/O failure and never panics or propagates. A
/// failed backup is advisory: the caller keeps processing the file.
#[instrument(skip_all, fields(path = %original.display()))]
pub fn ensure_backup(original: &Path, backup_dir: &Path, verify: bool) -> bool {
    match copy_to_backup(original, backup_dir, verify) {
        Ok(copy) => {
            debug!(backup = %copy.display(), "backup created");
            true
        }
        Err(err) => {
            warn!(error = %err, "backup failed");
            false
        }
    }
}

/// Copy `original` to `<backup_dir>/<file name>`, keeping its access and
/// modification times. With `verify`, the copy is re-hashed and deleted if
/// it does not match the original.
pub fn copy_to_backup(original: &Path, backup_dir: &Path, verify: bool) -> io::Result<PathBuf> {
    let file_name = original.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    std::fs::create_dir_all(backup_dir)?;

    let copy = backup_dir.join(file_name);
    std::fs::copy(original, &copy)?;

    let metadata = std::fs::metadata(original)?;
    let result = filetime::set_file_times(
        &copy,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .and_then(|()| {
        if verify && !integrity::same_content(original, &copy)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "backup copy does not match the original",
            ));
        }
        Ok(())
    });

    if let Err(err) = result {
        let _ = std::fs::remove_file(&copy);
        return Err(err);
    }
    Ok(copy)
}

/// The backup directory of one run.
///
/// The name is fixed when the run starts; the directory itself only appears
/// on disk with the first backup.
#[derive(Debug)]
pub struct BackupDir {
    path: PathBuf,
}

impl BackupDir {
    /// Pick `<folder>/_backups_<timestamp>`, suffixed `_2`, `_3`, ... if a
    /// directory of that name already exists (two runs in the same second).
    pub fn for_run<Tz>(folder: &Path, started: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let base = format!(
            "{BACKUP_DIR_PREFIX}{}",
            started.format(BACKUP_TIMESTAMP_FORMAT)
        );
        let mut path = folder.join(&base);
        let mut n = 2;
        while path.exists() {
            path = folder.join(format!("{base}_{n}"));
            n += 1;
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Back up one original into this directory. See [`ensure_backup`].
    pub fn back_up(&self, original: &Path, verify: bool) -> bool {
        ensure_backup(original, &self.path, verify)
    }

    /// Remove the directory if it is empty and return it if it was retained.
    pub fn finish(self) -> Option<PathBuf> {
        let mut entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(_) => return None,
        };
        if entries.next().is_some() {
            return Some(self.path);
        }
        if let Err(err) = std::fs::remove_dir(&self.path) {
            warn!(path = %self.path.display(), error = %err, "could not remove empty backup directory");
        }
        None
    }
}
