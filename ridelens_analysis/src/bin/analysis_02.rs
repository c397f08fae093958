// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance, duration and passenger-count figures, plus the distance summary on stdout.

use std::process::ExitCode;

use ridelens_analysis::analyses::DistanceDuration;
use ridelens_analysis::runner::run_cli;

fn main() -> ExitCode {
    run_cli(&DistanceDuration)
}
