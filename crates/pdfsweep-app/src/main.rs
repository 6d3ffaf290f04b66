// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfsweep: batch PDF restriction and link removal.
//
// Entry point. Initialises logging, loads config, starts the batch worker and
// renders its events until the terminal one arrives.

mod cli;
mod services;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pdfsweep_batch::{BatchRunner, spawn_batch};
use pdfsweep_core::error::{Result, SweepError};
use pdfsweep_core::types::BatchStatus;

use cli::Cli;
use services::config_dir::load_config;
use services::render::{Format, Renderer};

const EXIT_FAILURE: u8 = 1;
const EXIT_TOOL_MISSING: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(folder = %cli.folder.display(), "pdfsweep starting");

    match run(cli).await {
        Ok(BatchStatus::Cancelled) => ExitCode::from(EXIT_CANCELLED),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pdfsweep: {err}");
            ExitCode::from(match err {
                SweepError::ToolUnavailable(_) => EXIT_TOOL_MISSING,
                _ => EXIT_FAILURE,
            })
        }
    }
}

async fn run(cli: Cli) -> Result<BatchStatus> {
    let config = cli.apply(load_config(cli.config.as_deref())?);
    let runner = Arc::new(BatchRunner::from_config(&config)?);

    let mut handle = spawn_batch(runner, cli.folder.clone(), config.batch_options());

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the current file...");
            cancel.cancel();
        }
    });

    let format = if cli.json { Format::Json } else { Format::Text };
    let mut renderer = Renderer::new(format, std::io::stdout().lock());
    while let Some(event) = handle.next_event().await {
        if let Err(err) = renderer.render(&event) {
            tracing::warn!(error = %err, "could not write progress");
        }
    }

    let result = handle.join().await?;
    Ok(result.status)
}
