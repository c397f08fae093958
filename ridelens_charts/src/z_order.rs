// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Renderers sort by `(z_index, MarkId)`, so these coarse layers are all a chart needs to get a
//! stable paint order.

/// Plot background/frame fills.
pub const PLOT_BACKGROUND: i32 = -100;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Filled series marks (bars, boxes, heatmap cells, violin bodies).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (medians, whiskers, rules).
pub const SERIES_STROKE: i32 = 10;
/// Point series marks drawn above lines.
pub const SERIES_POINTS: i32 = 20;
/// Value annotations drawn on top of series (heatmap cell labels).
pub const SERIES_LABELS: i32 = 25;

/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = 50;

/// Legend swatches and colorbar cells.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend and colorbar labels.
pub const LEGEND_LABELS: i32 = 70;
/// Chart-level titles and annotations.
pub const TITLES: i32 = 80;
