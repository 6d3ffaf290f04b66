// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits the batch orchestrator is written against.
//
// The orchestrator never names a concrete PDF library or external tool; it
// only sees these two seams. Tests plug in scripted implementations.

use std::path::Path;

use pdfsweep_core::error::{RemoverError, StripError};

/// Produce an unrestricted copy of a PDF.
pub trait RestrictionRemover: Send + Sync {
    /// Probe that the underlying capability can run at all.
    ///
    /// Called once when a runner is built, never per file.
    fn check_available(&self) -> Result<(), RemoverError>;

    /// Write an unrestricted copy of `input` to `output`.
    ///
    /// On failure nothing is left at `output`.
    fn unrestrict(&self, input: &Path, output: &Path) -> Result<(), RemoverError>;
}

/// Remove link annotations from a PDF.
pub trait LinkStripper: Send + Sync {
    /// Read `input`, drop every annotation whose `/Subtype` is `/Link`, write
    /// the result to `output` and return the number removed.
    ///
    /// `input` and `output` must differ. The source document is released
    /// before this returns, whatever the outcome.
    fn strip_links(&self, input: &Path, output: &Path) -> Result<usize, StripError>;
}
