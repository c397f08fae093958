// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text tables printed alongside the figures.

use ridelens_core::{Table, Value};
use tabled::Tabled;

/// One row of the distance summary per (`user_type`, `passengers_cat`).
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryRow {
    /// User type.
    pub user_type: String,
    /// Passenger bin.
    pub passengers_cat: String,
    /// Number of rides.
    pub n: String,
    /// Mean distance.
    pub mean: String,
    /// Median distance.
    pub median: String,
    /// First quartile.
    pub q25: String,
    /// Third quartile.
    pub q75: String,
    /// Longest distance.
    pub max: String,
}

fn cell(table: &Table, row: usize, column: &str) -> String {
    match table.value(row, column) {
        None | Some(Value::Null) => "-".to_owned(),
        Some(Value::Float(v)) => format!("{v:.3}"),
        Some(v) => v.to_string(),
    }
}

/// Reads the summary table into display rows. Missing cells print as `-`.
pub fn summary_rows(summary: &Table) -> Vec<SummaryRow> {
    (0..summary.row_count())
        .map(|r| SummaryRow {
            user_type: cell(summary, r, "user_type"),
            passengers_cat: cell(summary, r, "passengers_cat"),
            n: cell(summary, r, "n"),
            mean: cell(summary, r, "mean"),
            median: cell(summary, r, "median"),
            q25: cell(summary, r, "q25"),
            q75: cell(summary, r, "q75"),
            max: cell(summary, r, "max"),
        })
        .collect()
}

/// Formats rows as an ASCII table.
pub fn format_summary(rows: &[SummaryRow]) -> String {
    if rows.is_empty() {
        return "no rides with passengers and a positive distance".to_owned();
    }
    tabled::Table::new(rows).to_string()
}
