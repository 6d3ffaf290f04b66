// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: link annotation inspection and removal.

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod links;

pub use links::LopdfLinkStripper;
