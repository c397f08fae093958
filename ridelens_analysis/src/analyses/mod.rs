// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three analyses and the pipeline that runs them.
//!
//! A run goes through the [`Stage`]s in order: load the source tables, check every program's
//! input columns against them, compute and render every figure in memory, and only then write
//! the figures. A failure in any stage leaves the figures directory untouched.

use std::path::PathBuf;

use hashbrown::HashMap;
use ridelens_core::{Table, TableId};
use ridelens_transforms::{Predicate, Program, Transform};

use crate::config::Config;
use crate::dataset::{Dataset, Source};
use crate::error::{AnalysisError, Stage};
use crate::figure::{Figure, write_figures};

mod destinations;
mod distance_duration;
mod usage_heatmap;

pub use destinations::Destinations;
pub use distance_duration::DistanceDuration;
pub use usage_heatmap::UsageHeatmap;

/// What an analysis produces before anything is written.
#[derive(Clone, Debug, Default)]
pub struct Output {
    /// Figures, in the order they are written.
    pub figures: Vec<Figure>,
    /// Text printed to stdout after the figures are written.
    pub report: Option<String>,
}

/// One analysis program.
pub trait Analysis {
    /// Binary name, used in logs.
    fn name(&self) -> &'static str;

    /// Tables the analysis reads.
    fn sources(&self) -> &'static [Source];

    /// Every transform program run by [`Analysis::build`], for the schema check.
    fn programs(&self) -> Vec<Program>;

    /// Computes and renders everything in memory.
    fn build(&self, dataset: &Dataset, config: &Config) -> Result<Output, AnalysisError>;
}

/// Loads, checks, builds and writes one analysis. Returns the written paths.
pub fn run(analysis: &dyn Analysis, config: &Config) -> Result<Vec<PathBuf>, AnalysisError> {
    let name = analysis.name();
    tracing::info!(
        analysis = name,
        stage = %Stage::Load,
        dir = %config.data_dir.display(),
        "loading tables"
    );
    let dataset = Dataset::load(&config.data_dir, analysis.sources())?;

    tracing::info!(analysis = name, stage = %Stage::Schema, "checking input columns");
    for program in analysis.programs() {
        dataset.validate(&program)?;
    }

    tracing::info!(analysis = name, stage = %Stage::Compute, "building figures");
    let output = analysis.build(&dataset, config)?;

    tracing::info!(
        analysis = name,
        stage = %Stage::Write,
        figures = output.figures.len(),
        dir = %config.figures_dir.display(),
        "writing figures"
    );
    let written = write_figures(&config.figures_dir, &output.figures)?;
    if let Some(report) = output.report {
        println!("{report}");
    }
    Ok(written)
}

/// Rows of `tables[input]` whose `user_type` is `user_type`.
fn rows_of_type(
    tables: &HashMap<TableId, Table>,
    input: TableId,
    user_type: &str,
) -> Result<Table, AnalysisError> {
    const SELECTED: TableId = TableId(990);
    let mut output = Program::new()
        .with(Transform::Filter {
            input,
            output: SELECTED,
            predicate: Predicate::equals("user_type", user_type),
        })
        .execute(tables)?;
    Ok(output.take(SELECTED).unwrap_or_default())
}

/// Every analysis, by binary name.
pub fn all() -> [&'static dyn Analysis; 3] {
    [&UsageHeatmap, &DistanceDuration, &Destinations]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_binaries() {
        let names: Vec<&str> = all().iter().map(|a| a.name()).collect();
        assert_eq!(names, ["analysis_01", "analysis_02", "analysis_03"]);
    }

    #[test]
    fn no_analysis_reads_spots() {
        for analysis in all() {
            assert!(!analysis.sources().contains(&Source::Spot), "{}", analysis.name());
        }
    }
}
