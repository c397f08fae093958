// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process entry point shared by the analysis binaries.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::analyses::{self, Analysis};
use crate::config::{Cli, Config};

/// Installs the stderr logger. `RUST_LOG` overrides `default_filter`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Parses the command line, runs `analysis`, and maps the outcome to an exit code.
pub fn run_cli(analysis: &dyn Analysis) -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.default_filter());
    let config = Config::from_cli(&cli);
    match analyses::run(analysis, &config) {
        Ok(written) => {
            tracing::info!(analysis = analysis.name(), figures = written.len(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(analysis = analysis.name(), stage = %e.stage(), "{e}");
            ExitCode::FAILURE
        }
    }
}
