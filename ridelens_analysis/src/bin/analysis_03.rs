// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destinations-per-ride figures.

use std::process::ExitCode;

use ridelens_analysis::analyses::Destinations;
use ridelens_analysis::runner::run_cli;

fn main() -> ExitCode {
    run_cli(&Destinations)
}
