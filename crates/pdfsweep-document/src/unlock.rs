// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restriction removal via the `qpdf` command-line tool.
//
// `qpdf --decrypt <in> <out>` rewrites a document without its security
// handler. It succeeds for owner-password-only files and fails when a user
// password is needed to open the document at all.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pdfsweep_core::error::RemoverError;
use tracing::{debug, info, instrument, warn};

use crate::traits::RestrictionRemover;

/// qpdf exit status for "succeeded, but emitted warnings". Output is written.
const EXIT_WARNINGS: i32 = 3;

/// [`RestrictionRemover`] that shells out to `qpdf`.
#[derive(Debug, Clone)]
pub struct QpdfRemover {
    program: PathBuf,
}

impl QpdfRemover {
    /// Use `program` (a bare name is looked up on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for QpdfRemover {
    fn default() -> Self {
        Self::new("qpdf")
    }
}

impl RestrictionRemover for QpdfRemover {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    fn check_available(&self) -> Result<(), RemoverError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                RemoverError::ToolUnavailable(format!(
                    "cannot execute {}: {err}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            return Err(RemoverError::ToolUnavailable(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        info!(version = stdout.lines().next().unwrap_or_default(), "qpdf available");
        Ok(())
    }

    #[instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    fn unrestrict(&self, input: &Path, output: &Path) -> Result<(), RemoverError> {
        // qpdf reports a missing input like any other open failure; check it
        // here so a file deleted mid-run is not mistaken for a locked one.
        if let Err(err) = std::fs::metadata(input) {
            return Err(RemoverError::Other(format!("{}: {err}", input.display())));
        }

        let result = self.run_decrypt(input, output);
        if result.is_err() {
            discard_partial(output);
        }
        result
    }
}

impl QpdfRemover {
    fn run_decrypt(&self, input: &Path, output: &Path) -> Result<(), RemoverError> {
        let process = Command::new(&self.program)
            .arg("--decrypt")
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    RemoverError::ToolUnavailable(format!(
                        "{} not found: {err}",
                        self.program.display()
                    ))
                } else {
                    RemoverError::Other(format!(
                        "failed to execute {}: {err}",
                        self.program.display()
                    ))
                }
            })?;

        classify_exit(process.status.code(), &process.stderr)?;

        if !output.is_file() {
            return Err(RemoverError::Other(format!(
                "qpdf reported success but wrote no {}",
                output.display()
            )));
        }
        debug!("restrictions removed");
        Ok(())
    }
}

/// Map a qpdf exit status and its diagnostics onto a [`RemoverError`].
///
/// Any run that qpdf itself rejects (non-zero exit other than the warnings
/// status, or death by signal) means the document could not be opened for
/// rewriting, which is reported as [`RemoverError::PasswordRequired`] so the
/// file is skipped rather than counted as an error.
pub fn classify_exit(code: Option<i32>, stderr: &[u8]) -> Result<(), RemoverError> {
    let diagnostics = String::from_utf8_lossy(stderr).trim().to_string();
    match code {
        Some(0) => Ok(()),
        Some(EXIT_WARNINGS) => {
            warn!(%diagnostics, "qpdf finished with warnings");
            Ok(())
        }
        Some(code) => {
            debug!(code, %diagnostics, "qpdf refused the document");
            Err(RemoverError::PasswordRequired(if diagnostics.is_empty() {
                format!("qpdf exited with status {code}")
            } else {
                diagnostics
            }))
        }
        None => Err(RemoverError::PasswordRequired(format!(
            "qpdf terminated by signal: {diagnostics}"
        ))),
    }
}

fn discard_partial(output: &Path) {
    match std::fs::remove_file(output) {
        Ok(()) => debug!(path = %output.display(), "partial output removed"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %output.display(), error = %err, "could not remove partial output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_PROGRAM: &str = "/nonexistent/pdfsweep-test/qpdf";

    #[test]
    fn zero_and_warning_exits_succeed() {
        assert!(classify_exit(Some(0), b"").is_ok());
        assert!(classify_exit(Some(3), b"WARNING: xref stream damaged").is_ok());
    }

    #[test]
    fn invalid_password_is_password_required() {
        let err = classify_exit(Some(2), b"qpdf: locked.pdf: invalid password\n")
            .expect_err("must fail");
        match err {
            RemoverError::PasswordRequired(detail) => {
                assert_eq!(detail, "qpdf: locked.pdf: invalid password");
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn any_refusal_is_a_skip() {
        let err = classify_exit(Some(2), b"qpdf: broken.pdf: file is damaged").expect_err("fail");
        assert!(matches!(err, RemoverError::PasswordRequired(detail) if detail.contains("damaged")));

        let err = classify_exit(Some(2), b"").expect_err("fail");
        assert!(matches!(err, RemoverError::PasswordRequired(detail) if detail.contains("status 2")));

        let err = classify_exit(None, b"").expect_err("fail");
        assert!(matches!(err, RemoverError::PasswordRequired(_)));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let remover = QpdfRemover::new(MISSING_PROGRAM);
        assert!(matches!(
            remover.check_available(),
            Err(RemoverError::ToolUnavailable(_))
        ));
    }

    #[test]
    fn missing_program_during_unrestrict_leaves_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-1.5\n").expect("write");
        let output = dir.path().join("out.pdf");

        let err = QpdfRemover::new(MISSING_PROGRAM)
            .unrestrict(&input, &output)
            .expect_err("must fail");
        assert!(matches!(err, RemoverError::ToolUnavailable(_)));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_is_other_not_locked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = QpdfRemover::new(MISSING_PROGRAM)
            .unrestrict(&dir.path().join("gone.pdf"), &dir.path().join("out.pdf"))
            .expect_err("must fail");
        assert!(matches!(err, RemoverError::Other(_)));
    }
}
