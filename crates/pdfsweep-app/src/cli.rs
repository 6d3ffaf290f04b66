// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use pdfsweep_core::config::SweepConfig;

/// Remove owner restrictions and hyperlink annotations from every PDF in a folder.
#[derive(Debug, Parser)]
#[command(name = "pdfsweep", version)]
pub struct Cli {
    /// Folder whose PDF files are processed (not recursive)
    pub folder: PathBuf,

    /// Don't copy originals into a `_backups_<timestamp>` folder first
    #[arg(long)]
    pub no_backup: bool,

    /// Path to the qpdf executable
    #[arg(long, value_name = "PATH")]
    pub qpdf: Option<PathBuf>,

    /// Append the run log to this file
    #[arg(long, value_name = "PATH", conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Don't write a run log
    #[arg(long)]
    pub no_log_file: bool,

    /// Print progress events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/pdfsweep/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Diagnostic log filter, used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply flag overrides on top of file settings.
    pub fn apply(&self, mut config: SweepConfig) -> SweepConfig {
        if self.no_backup {
            config.create_backup = false;
        }
        if let Some(qpdf) = &self.qpdf {
            config.qpdf_program = qpdf.display().to_string();
        }
        if self.no_log_file {
            config.run_log = None;
        } else if let Some(path) = &self.log_file {
            config.run_log = Some(path.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "pdfsweep",
            "/in",
            "--no-backup",
            "--qpdf",
            "/opt/qpdf",
            "--no-log-file",
        ]);
        let config = cli.apply(SweepConfig::default());
        assert!(!config.create_backup);
        assert_eq!(config.qpdf_program, "/opt/qpdf");
        assert_eq!(config.run_log, None);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::parse_from(["pdfsweep", "/in"]);
        assert_eq!(cli.apply(SweepConfig::default()), SweepConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn log_file_flags_conflict() {
        let parsed = Cli::try_parse_from(["pdfsweep", "/in", "--log-file", "x.log", "--no-log-file"]);
        assert!(parsed.is_err());
    }
}
