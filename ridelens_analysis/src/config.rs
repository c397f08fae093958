// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command line and run configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Default dataset directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "25-database-class";
/// Default output directory for figures.
pub const DEFAULT_FIGURES_DIR: &str = "figures";
/// User types that get their own figures.
pub const DEFAULT_USER_TYPES: [&str; 2] = ["staff", "student"];

/// Arguments shared by every analysis binary.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Directory holding `history.csv`, `user.csv`, `trip.csv` and `spot.csv`.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory figures are written into; created if missing.
    #[arg(long, default_value = DEFAULT_FIGURES_DIR)]
    pub figures_dir: PathBuf,

    /// Raise the log level (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The log filter used when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Where an analysis reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Dataset directory.
    pub data_dir: PathBuf,
    /// Figure output directory.
    pub figures_dir: PathBuf,
    /// User types rendered as separate panels or boxes, in display order.
    pub user_types: Vec<String>,
}

impl Config {
    /// A config over the given directories with the default user types.
    pub fn new(data_dir: impl Into<PathBuf>, figures_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            figures_dir: figures_dir.into(),
            user_types: DEFAULT_USER_TYPES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Builds a config from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.data_dir.clone(), cli.figures_dir.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_FIGURES_DIR)
    }
}
