// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate enumeration: the PDF files directly inside the input folder.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use pdfsweep_core::error::{Result, SweepError};
use tracing::{debug, instrument};

/// List regular files directly inside `folder` with a `.pdf` extension
/// (any case), sorted by name.
///
/// The returned list is the run's snapshot: files created later are never
/// seen, files deleted later fail individually.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn list_candidates(folder: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(folder).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            SweepError::FolderNotFound(folder.to_path_buf())
        } else {
            SweepError::Io(err)
        }
    })?;
    if !metadata.is_dir() {
        return Err(SweepError::NotAFolder(folder.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if has_pdf_extension(&path) && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    debug!(count = candidates.len(), "candidates listed");
    Ok(candidates)
}

/// Case-insensitive `.pdf` extension check.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.5\n").expect("write");
    }

    #[test]
    fn filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "A.PDF");
        touch(dir.path(), "c.Pdf");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "archive.pdf.tmp");
        std::fs::create_dir(dir.path().join("folder.pdf")).expect("mkdir");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");
        touch(&dir.path().join("nested"), "deep.pdf");

        let names: Vec<String> = list_candidates(dir.path())
            .expect("list")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["A.PDF", "b.pdf", "c.Pdf"]);
    }

    #[test]
    fn missing_folder_is_folder_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_candidates(&missing),
            Err(SweepError::FolderNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn file_path_is_not_a_folder() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "a.pdf");
        assert!(matches!(
            list_candidates(&dir.path().join("a.pdf")),
            Err(SweepError::NotAFolder(_))
        ));
    }

    #[test]
    fn extension_check() {
        assert!(has_pdf_extension(Path::new("x.pdf")));
        assert!(has_pdf_extension(Path::new("x.PdF")));
        assert!(!has_pdf_extension(Path::new("x.pdfx")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }
}
