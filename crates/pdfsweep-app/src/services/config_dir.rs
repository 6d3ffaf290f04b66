// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use pdfsweep_core::config::SweepConfig;
use pdfsweep_core::error::Result;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.json";

/// `$XDG_CONFIG_HOME/pdfsweep/config.json`, else `$HOME/.config/pdfsweep/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    resolve_config_dir(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}

fn resolve_config_dir(xdg: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.filter(|v| !v.is_empty())?).join(".config"),
    };
    Some(base.join("pdfsweep"))
}

/// An explicit path must exist and parse. The default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<SweepConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return SweepConfig::load(path);
    }
    match default_config_path() {
        Some(path) => {
            debug!(path = %path.display(), "loading default config");
            SweepConfig::load_or_default(path)
        }
        None => Ok(SweepConfig::default()),
    }
}
