// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ride dataset analyses.
//!
//! Each analysis loads the CSV tables it needs into a [`Dataset`], checks that the columns its
//! transform programs read are present with usable types, runs those programs, renders its
//! charts to SVG in memory and finally writes every [`Figure`] into the figures directory.
//!
//! ```no_run
//! use ridelens_analysis::{Config, analyses};
//!
//! let config = Config::new("25-database-class", "figures");
//! let written = analyses::run(&analyses::UsageHeatmap, &config)?;
//! assert_eq!(written.len(), 2);
//! # Ok::<(), ridelens_analysis::AnalysisError>(())
//! ```
//!
//! The `analysis_01`, `analysis_02` and `analysis_03` binaries wrap [`runner::run_cli`].

pub mod analyses;
pub mod config;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod group_mean;
pub mod plots;
pub mod preprocess;
pub mod report;
pub mod runner;

pub use config::{Cli, Config};
pub use dataset::{Dataset, Source};
pub use error::{AnalysisError, Stage};
pub use figure::{Figure, write_figures};
