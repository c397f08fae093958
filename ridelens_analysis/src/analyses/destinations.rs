// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `analysis_03`: how many destinations a ride visits, and how that relates to distance and
//! passengers.

use ridelens_charts::{DEFAULT_SEED, Size};
use ridelens_core::Value;
use ridelens_transforms::{
    Program, distinct_strings, pivot_matrix, threshold_levels, values_by_category,
};

use super::{Analysis, Output};
use crate::config::Config;
use crate::dataset::{Dataset, Source};
use crate::error::AnalysisError;
use crate::plots::{self, HeatmapOptions, Titles};
use crate::preprocess::{BIN_THRESHOLD, PASSENGER_SPOT_COUNTS, RIDE_FEATURES, ride_features};

/// Standard deviation of the horizontal jitter, in band widths.
const JITTER_SD: f64 = 0.06;

/// Violin, jitter and box plots of destinations per ride, plus the passengers x destinations
/// share heatmap.
#[derive(Clone, Copy, Debug, Default)]
pub struct Destinations;

impl Analysis for Destinations {
    fn name(&self) -> &'static str {
        "analysis_03"
    }

    fn sources(&self) -> &'static [Source] {
        &[Source::History, Source::User, Source::Trip]
    }

    fn programs(&self) -> Vec<Program> {
        vec![ride_features()]
    }

    fn build(&self, dataset: &Dataset, _config: &Config) -> Result<Output, AnalysisError> {
        let output = ride_features().execute(dataset.tables())?;
        let rides = output.table(RIDE_FEATURES).cloned().unwrap_or_default();
        let levels = threshold_levels(BIN_THRESHOLD);

        let user_types = distinct_strings(&rides, RIDE_FEATURES, "user_type")?;
        let spots =
            values_by_category(&rides, RIDE_FEATURES, "user_type", "spots_n", &user_types)?;
        let violin = plots::violin_with_box(
            "03_violin_spots_by_user_type.svg",
            &Titles::new("spots per ride by user_type", "user_type", "spots_n"),
            &user_types,
            &spots,
        )?;

        let distance =
            values_by_category(&rides, RIDE_FEATURES, "spots_bin", "distance", &levels)?;
        let jitter = plots::jitter(
            "03_jitter_distance_by_spots.svg",
            &Titles::new("spots x distance: jitter", "spots_bin", "distance"),
            &levels,
            &distance,
            JITTER_SD,
            DEFAULT_SEED,
        )?;
        let boxplot = plots::boxplot(
            "03_boxplot_distance_by_spots.svg",
            &Titles::new("spots x distance", "spots_bin", "distance"),
            &levels,
            &distance,
        )?;

        let counts = output
            .table(PASSENGER_SPOT_COUNTS)
            .cloned()
            .unwrap_or_default();
        let bins: Vec<Value> = levels.iter().map(|l| Value::from(l.as_str())).collect();
        let shares = pivot_matrix(
            &counts,
            PASSENGER_SPOT_COUNTS,
            ("passengers_bin", &bins),
            ("spots_bin", &bins),
            "n",
        )?
        .normalized();
        tracing::debug!(rides = rides.row_count(), "built passengers x spots shares");
        let heatmap = plots::heatmap(
            "03_heatmap_passengers_spots.svg",
            &Titles::new(
                "passengers x spots: share of rides",
                "spots_bin",
                "passengers_bin",
            ),
            &shares,
            &HeatmapOptions {
                row_labels: levels.clone(),
                col_labels: levels.clone(),
                colorbar_title: Some("share".to_owned()),
                annotate: Some(2),
                cell: Size::new(48.0, 40.0),
            },
        )?;

        Ok(Output {
            figures: vec![violin, jitter, boxplot, heatmap],
            report: None,
        })
    }
}
