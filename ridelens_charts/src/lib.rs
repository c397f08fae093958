// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `ridelens_core`.
//!
//! This crate is a small layer above `ridelens_core`:
//! - **Scales** map data values into scene coordinates.
//! - **Guides** (titles, axes, swatch legends, colorbars) are built by generating
//!   `ridelens_core::Mark`s.
//! - **Series marks** cover the statistical plots ride analyses need: bars, points, jittered
//!   strips, boxplots, violins and annotated heatmaps.
//!
//! [`ChartSpec`] ties these together with a measure/arrange layout pass. Text shaping is out of
//! scope; text marks store unshaped strings and layout measures them through a
//! [`TextMeasurer`].

mod axis;
mod bar_mark;
mod boxplot_mark;
mod chart_spec;
mod color;
mod colorbar;
mod format;
mod heatmap_mark;
mod jitter;
mod layout;
mod legend;
mod measure;
mod point_mark;
mod rect_mark;
mod rule_mark;
mod scale;
mod symbol;
mod text_mark;
mod title;
mod violin_mark;
pub mod z_order;

pub use axis::{AxisOrient, AxisSpec, AxisStyle, GridStyle, StrokeStyle, TickFormatter};
pub use bar_mark::BarMarkSpec;
pub use boxplot_mark::BoxplotMarkSpec;
pub use chart_spec::{ChartSpec, Guide, PLOT_BACKGROUND_ID, PLOT_FRAME_ID};
pub use color::{ColorScale, category_color, viridis};
pub use colorbar::ColorbarSpec;
pub use format::{format_fixed, format_tick_with_step};
pub use heatmap_mark::HeatmapMarkSpec;
pub use jitter::{DEFAULT_SEED, JitterRng, jitter_points};
pub use layout::{ChartLayout, ChartLayoutSpec, LegendOrient, LegendPlacement, Size};
pub use legend::{LegendItem, LegendSwatchesSpec};
pub use measure::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use point_mark::PointMarkSpec;
pub use rect_mark::RectMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    ScaleBand, ScaleBandSpec, ScaleLinear, ScaleLinearSpec, ScaleSpec, infer_domain,
};
pub use symbol::Symbol;
pub use text_mark::TextMarkSpec;
pub use title::TitleSpec;
pub use violin_mark::ViolinMarkSpec;
pub use z_order::*;
