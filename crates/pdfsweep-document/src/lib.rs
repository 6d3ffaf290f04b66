// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfsweep-document: the two document capabilities the batch pipeline
// drives: removing owner restrictions (via the external `qpdf` tool) and
// stripping link annotations (via `lopdf`).

pub mod pdf;
pub mod traits;
pub mod unlock;

// Re-export the primary types so callers can use `pdfsweep_document::QpdfRemover` etc.
pub use pdf::links::{LopdfLinkStripper, count_link_annotations};
pub use traits::{LinkStripper, RestrictionRemover};
pub use unlock::QpdfRemover;
