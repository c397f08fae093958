// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `analysis_02`: ride distance and duration by user type, and distance by passenger count.

use ridelens_core::Table;
use ridelens_transforms::{Program, distinct_strings, threshold_levels, values_by_category};

use super::{Analysis, Output, rows_of_type};
use crate::config::Config;
use crate::dataset::{Dataset, Source};
use crate::error::AnalysisError;
use crate::figure::{Figure, file_name_fragment};
use crate::group_mean::group_mean_bar;
use crate::plots::{self, Titles};
use crate::preprocess::{
    BIN_THRESHOLD, PASSENGER_RIDES, PASSENGER_SUMMARY, RIDE_DURATIONS, passenger_rides,
    ride_durations,
};
use crate::report::{format_summary, summary_rows};

/// Box plots of distance and duration, the passenger summary, a scatter, a bar chart of mean
/// distance, and per-type box plots by passenger count.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceDuration;

impl Analysis for DistanceDuration {
    fn name(&self) -> &'static str {
        "analysis_02"
    }

    fn sources(&self) -> &'static [Source] {
        &[Source::History, Source::User]
    }

    fn programs(&self) -> Vec<Program> {
        vec![ride_durations(), passenger_rides()]
    }

    fn build(&self, dataset: &Dataset, config: &Config) -> Result<Output, AnalysisError> {
        let mut durations = ride_durations().execute(dataset.tables())?;
        let rides = durations.take(RIDE_DURATIONS).unwrap_or_default();
        let mut figures = vec![
            user_type_boxplot(
                &rides,
                &config.user_types,
                "distance_f",
                "02_boxplot_distance_by_user_type.svg",
                "distance by user_type",
            )?,
            user_type_boxplot(
                &rides,
                &config.user_types,
                "duration_min",
                "02_boxplot_duration_by_user_type.svg",
                "duration (min) by user_type",
            )?,
        ];

        let passengers = passenger_rides().execute(dataset.tables())?;
        let rides = passengers.table(PASSENGER_RIDES).cloned().unwrap_or_default();
        let summary = passengers
            .table(PASSENGER_SUMMARY)
            .cloned()
            .unwrap_or_default();
        let report = format_summary(&summary_rows(&summary));

        let user_types = distinct_strings(&rides, PASSENGER_RIDES, "user_type")?;
        figures.push(passenger_scatter(&rides, &user_types)?);

        let levels = threshold_levels(BIN_THRESHOLD);
        let means = group_mean_bar(
            &rides,
            "passengers_cat",
            "distance",
            Some(&levels),
            "02_bar_mean_distance_by_passengers.svg",
            &Titles::new(
                "mean distance by passengers_cat",
                "passengers_cat",
                "mean distance",
            ),
        )?;
        figures.push(means.figure);

        for user_type in &user_types {
            let of_type = rows_of_type(&passengers.tables, PASSENGER_RIDES, user_type)?;
            let groups = values_by_category(
                &of_type,
                PASSENGER_RIDES,
                "passengers_cat",
                "distance",
                &levels,
            )?;
            let (categories, groups): (Vec<String>, Vec<Vec<f64>>) = levels
                .iter()
                .cloned()
                .zip(groups)
                .filter(|(_, g)| !g.is_empty())
                .unzip();
            if categories.is_empty() {
                tracing::warn!(
                    user_type = %user_type,
                    "no rides with passengers; skipping box plot"
                );
                continue;
            }
            figures.push(plots::boxplot(
                &format!(
                    "02_boxplot_distance_by_passengers_{}.svg",
                    file_name_fragment(user_type)
                ),
                &Titles::new(
                    format!("distance by passengers_cat ({user_type})"),
                    "passengers_cat",
                    "distance",
                ),
                &categories,
                &groups,
            )?);
        }

        Ok(Output {
            figures,
            report: Some(report),
        })
    }
}

fn user_type_boxplot(
    rides: &Table,
    user_types: &[String],
    column: &str,
    file_name: &str,
    title: &str,
) -> Result<Figure, AnalysisError> {
    let groups = values_by_category(rides, RIDE_DURATIONS, "user_type", column, user_types)?;
    plots::boxplot(
        file_name,
        &Titles::new(title, "user_type", column),
        user_types,
        &groups,
    )
}

fn passenger_scatter(rides: &Table, user_types: &[String]) -> Result<Figure, AnalysisError> {
    let mut series: Vec<(String, Vec<(f64, f64)>)> = user_types
        .iter()
        .map(|t| (t.clone(), Vec::new()))
        .collect();
    for r in 0..rides.row_count() {
        let user_type = rides.value(r, "user_type").unwrap_or_default();
        let x = rides.value(r, "passengers_count").and_then(|v| v.as_f64());
        let y = rides.value(r, "distance").and_then(|v| v.as_f64());
        let slot = series
            .iter_mut()
            .find(|(t, _)| Some(t.as_str()) == user_type.as_str());
        if let (Some((_, points)), Some(x), Some(y)) = (slot, x, y) {
            points.push((x, y));
        }
    }
    plots::scatter(
        "02_scatter_distance_by_passengers.svg",
        &Titles::new(
            "passengers_count vs distance (by user_type)",
            "passengers_count",
            "distance",
        ),
        &series,
    )
}
