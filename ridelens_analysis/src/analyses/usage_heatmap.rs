// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `analysis_01`: when each user type rides, as a weekday x hour heatmap.

use ridelens_charts::Size;
use ridelens_core::{Table, Value};
use ridelens_transforms::{Program, ProgramOutput, pivot_matrix};

use super::{Analysis, Output, rows_of_type};
use crate::config::Config;
use crate::dataset::{Dataset, Source};
use crate::error::AnalysisError;
use crate::figure::{Figure, file_name_fragment};
use crate::plots::{self, HeatmapOptions, Titles};
use crate::preprocess::{USAGE_SHARE, usage_share};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Share of each user type's rides per weekday and hour.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsageHeatmap;

impl UsageHeatmap {
    /// Output file for one user type.
    pub fn file_name(user_type: &str) -> String {
        format!("01_heatmap_dow_hour_{}.svg", file_name_fragment(user_type))
    }
}

impl Analysis for UsageHeatmap {
    fn name(&self) -> &'static str {
        "analysis_01"
    }

    fn sources(&self) -> &'static [Source] {
        &[Source::History, Source::User]
    }

    fn programs(&self) -> Vec<Program> {
        vec![usage_share()]
    }

    fn build(&self, dataset: &Dataset, config: &Config) -> Result<Output, AnalysisError> {
        let shares = usage_share().execute(dataset.tables())?;
        let figures = config
            .user_types
            .iter()
            .map(|user_type| heatmap_for(&shares, user_type))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Output {
            figures,
            report: None,
        })
    }
}

fn heatmap_for(shares: &ProgramOutput, user_type: &str) -> Result<Figure, AnalysisError> {
    let table = rows_of_type(&shares.tables, USAGE_SHARE, user_type)?;

    let dows: Vec<Value> = (0..7).map(Value::Int).collect();
    let hours: Vec<Value> = (0..24).map(Value::Int).collect();
    let matrix = pivot_matrix(
        &table,
        USAGE_SHARE,
        ("dow", &dows),
        ("hour", &hours),
        "share_within_type",
    )?;
    let total = total_rides(&table);
    tracing::debug!(user_type, total, "built weekday x hour matrix");

    let titles = Titles::new(
        format!("{user_type}: share within type by dow x hour (total rides={total})"),
        "Hour of day",
        "Day of week",
    );
    let options = HeatmapOptions {
        row_labels: WEEKDAYS.iter().map(|d| (*d).to_owned()).collect(),
        col_labels: (0..24).map(|h: i32| h.to_string()).collect(),
        colorbar_title: Some("share_within_type".to_owned()),
        annotate: None,
        cell: Size::new(24.0, 22.0),
    };
    plots::heatmap(&UsageHeatmap::file_name(user_type), &titles, &matrix, &options)
}

fn total_rides(table: &Table) -> i64 {
    (0..table.row_count())
        .filter_map(|r| table.value(r, "ride_count").and_then(|v| v.as_i64()))
        .sum()
}
