// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weekday x hour usage heatmaps per user type.

use std::process::ExitCode;

use ridelens_analysis::analyses::UsageHeatmap;
use ridelens_analysis::runner::run_cli;

fn main() -> ExitCode {
    run_cli(&UsageHeatmap)
}
