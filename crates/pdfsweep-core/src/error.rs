// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pdfsweep.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for batch-level operations.
///
/// Per-file failures never surface as a `SweepError` from a run; they are
/// classified into a [`crate::FileOutcome`] instead.
#[derive(Debug, Error)]
pub enum SweepError {
    // -- Preconditions --
    #[error("folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("not a folder: {}", .0.display())]
    NotAFolder(PathBuf),

    #[error("restriction removal tool unavailable: {0}")]
    ToolUnavailable(String),

    // -- Per-file pipeline steps --
    #[error("restriction removal failed: {0}")]
    Unrestrict(#[from] RemoverError),

    #[error("link stripping failed: {0}")]
    Strip(#[from] StripError),

    #[error("replacing {} failed: {source}", path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Ambient --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("batch worker failed: {0}")]
    Worker(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure modes of the external restriction-removal capability.
#[derive(Debug, Error)]
pub enum RemoverError {
    /// The document is protected by a user password we do not have.
    #[error("password required: {0}")]
    PasswordRequired(String),

    /// The external tool is missing or cannot be executed.
    #[error("tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Failure modes of the link stripper.
#[derive(Debug, Error)]
pub enum StripError {
    #[error("failed to load {}: {detail}", path.display())]
    Load { path: PathBuf, detail: String },

    #[error("malformed page {page}: {detail}")]
    Malformed { page: u32, detail: String },

    #[error("failed to save {}: {detail}", path.display())]
    Save { path: PathBuf, detail: String },
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remover_error_converts_into_sweep_error() {
        let err: SweepError = RemoverError::Other("exit status 2".into()).into();
        assert!(matches!(err, SweepError::Unrestrict(RemoverError::Other(_))));
        assert_eq!(
            err.to_string(),
            "restriction removal failed: exit status 2"
        );
    }

    #[test]
    fn replace_error_names_the_path() {
        let err = SweepError::Replace {
            path: PathBuf::from("/data/a.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/a.pdf"));
        assert!(err.to_string().contains("denied"));
    }
}
